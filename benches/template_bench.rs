//! Quick benchmark to verify template resolution performance

use std::time::Instant;

use deckhand::{
    collect_template_references, resolve_template_string, resolve_template_strings,
    ResolveOptions, ValueContext,
};
use serde_json::json;

fn main() {
    // Setup context with some data
    let ctx = ValueContext::new(json!({
        "environment": {"name": "dev"},
        "modules": {
            "db": {"outputs": {"host": "postgres", "port": 5432}},
            "api": {"version": "v-1a2b3c"}
        }
    }));
    let options = ResolveOptions::default();

    // Test templates of varying complexity
    let templates = vec![
        "Simple text with no templates",
        "${environment.name}",
        "postgres://${modules.db.outputs.host}:${modules.db.outputs.port}/app",
        "api:${modules.api.version || 'latest'} in ${environment.name}",
        "${missing.a || missing.b || modules.db.outputs.host} ${environment.name} mixed content",
    ];

    println!("Template Resolution Performance Test");
    println!("====================================\n");

    for template in &templates {
        let iterations = 100_000;
        let start = Instant::now();

        for _ in 0..iterations {
            let _ = resolve_template_string(template, &ctx, &options);
        }

        let elapsed = start.elapsed();
        let per_op = elapsed / iterations;

        println!("Template: {:60}", format!("\"{}\"", template));
        println!("  Time for {} iterations: {:?}", iterations, elapsed);
        println!("  Per operation: {:?}\n", per_op);
    }

    println!("Tree Resolution / Reference Collection");
    println!("======================================\n");

    let services: Vec<_> = (0..50)
        .map(|i| {
            json!({
                "name": format!("svc-{i}"),
                "image": "registry/${environment.name}/app:${modules.api.version}",
                "env": {"DB": "${modules.db.outputs.host}:${modules.db.outputs.port}"}
            })
        })
        .collect();
    let tree = json!({ "services": services });

    let iterations = 1_000;
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = resolve_template_strings(&tree, &ctx, &options);
    }
    println!("  resolve_template_strings x{}: {:?}", iterations, start.elapsed());

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = collect_template_references(&tree);
    }
    println!("  collect_template_references x{}: {:?}", iterations, start.elapsed());
}
