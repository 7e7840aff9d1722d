//! Deckhand CLI - resolve and inspect templated configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use deckhand::config::{self, OutputFormat};
use deckhand::{
    collect_template_references, resolve_template_strings, DeckhandError, FixSuggestion,
    ModuleContext, ProjectContext, ResolveOptions,
};

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(about = "Deckhand - resolve ${...} templates in deployment configuration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every template in a configuration file
    Resolve {
        /// Path to a YAML or JSON configuration file
        file: PathBuf,

        /// Context file (environment, variables, modules)
        #[arg(short, long)]
        context: Option<PathBuf>,

        /// Resolve missing keys to null instead of failing
        #[arg(long)]
        allow_undefined: bool,

        /// Output format (json, yaml)
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// List the key paths referenced by templates, sorted
    Refs {
        /// Path to a YAML or JSON configuration file
        file: PathBuf,
    },

    /// Check template syntax without resolving
    Validate {
        /// Path to a YAML or JSON configuration file
        file: PathBuf,
    },
}

fn main() {
    // Logs go to stderr; stdout carries resolved output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            file,
            context,
            allow_undefined,
            format,
        } => resolve_file(&file, context.as_deref(), allow_undefined, format),
        Commands::Refs { file } => list_references(&file),
        Commands::Validate { file } => validate_file(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn resolve_file(
    file: &std::path::Path,
    context_file: Option<&std::path::Path>,
    allow_undefined: bool,
    format: OutputFormat,
) -> Result<(), DeckhandError> {
    let tree = config::load_tree(file)?;

    let context = match context_file {
        Some(path) => config::load_module_context(path)?,
        None => ModuleContext::default(),
    }
    .with_project(ProjectContext::from_process());

    let options = ResolveOptions::new().allow_undefined(allow_undefined);
    let resolved = resolve_template_strings(&tree, &context, &options)?;

    println!("{}", config::render(&resolved, format)?);
    Ok(())
}

fn list_references(file: &std::path::Path) -> Result<(), DeckhandError> {
    let tree = config::load_tree(file)?;
    for reference in collect_template_references(&tree)? {
        println!("{}", reference.join("."));
    }
    Ok(())
}

fn validate_file(file: &std::path::Path) -> Result<(), DeckhandError> {
    let tree = config::load_tree(file)?;
    let references = collect_template_references(&tree)?;

    println!(
        "{} {}: {} references",
        "✓".green(),
        file.display(),
        references.len()
    );
    Ok(())
}
