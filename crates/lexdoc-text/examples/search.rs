use std::env;

use lexdoc_core::types::SearchFilters;
use lexdoc_text::CatalogIndex;

// Search the built-in catalog and print results.
// Usage:
//   cargo run -p lexdoc-text --example search -- "your query" \
//     [--type Civil] [--keyword terras] [--limit 10] [--facets]

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut query = String::new();
    let mut filters = SearchFilters::default();
    let mut limit: usize = 10;
    let mut show_facets = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--type" => {
                if i + 1 >= args.len() {
                    eprintln!("--type requires a value");
                    std::process::exit(2);
                }
                filters.document_type = Some(args[i + 1].clone());
                i += 2;
                continue;
            }
            "--keyword" => {
                if i + 1 >= args.len() {
                    eprintln!("--keyword requires a value");
                    std::process::exit(2);
                }
                filters.add_keyword(&args[i + 1]);
                i += 2;
                continue;
            }
            "--limit" => {
                if i + 1 >= args.len() {
                    eprintln!("--limit requires a number");
                    std::process::exit(2);
                }
                limit = args[i + 1].parse().unwrap_or(limit);
                i += 2;
                continue;
            }
            "--facets" => {
                show_facets = true;
                i += 1;
                continue;
            }
            s if s.starts_with('-') => {
                eprintln!("Unknown flag: {}", s);
                std::process::exit(2);
            }
            s => {
                if query.is_empty() {
                    query = s.to_string();
                }
                i += 1;
                continue;
            }
        }
    }

    println!("Catalog search\n==============");
    println!("Query: {} (limit {})\n", query, limit);

    let index = CatalogIndex::from_catalog()?;
    for (i, h) in index.search(&query, &filters, limit)?.iter().enumerate() {
        println!("{:>2}. score={:.3} id={} category={}\n    {}", i + 1, h.score, h.id, h.category, h.title);
    }

    if show_facets {
        println!("\nCategories:");
        for (category, count) in index.category_counts(&query)? {
            println!("  {} -> {}", category, count);
        }
    }

    Ok(())
}
