//! Deckhand - template expression engine for deployment configuration
//!
//! Configuration values may embed `${...}` expressions that are resolved
//! against a [`ConfigContext`]. The same expressions are scanned without a
//! context to find the key paths a configuration depends on, which is what
//! dependency ordering between services is built from.

pub mod config;
pub mod context;
pub mod error;
pub mod template;
pub mod value;

pub use context::{
    ConfigContext, ContextLookup, ModuleContext, ModuleInfo, ProjectContext, ValueContext,
};
pub use error::{DeckhandError, FixSuggestion, TemplateError};
pub use template::{
    collect_template_references, resolve_template_string, resolve_template_strings, Reference,
    ResolveOptions,
};
pub use value::Primitive;
