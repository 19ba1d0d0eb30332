use clap::Args;
use sprayflow_core::catalog::{all_movements, movements_in};
use sprayflow_core::{Category, Movement};

#[derive(Args)]
pub struct CatalogArgs {
    /// Only list this category
    #[arg(long, short)]
    category: Option<Category>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CatalogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let movements: Vec<&Movement> = match args.category {
        Some(category) => movements_in(category).collect(),
        None => all_movements().iter().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&movements)?);
        return Ok(());
    }

    let mut last: Option<Category> = None;
    for m in movements {
        if last != Some(m.category) {
            if last.is_some() {
                println!();
            }
            println!("{}", m.category.label());
            last = Some(m.category);
        }
        println!("  {:>2}  {}", m.id, m.name);
    }
    Ok(())
}
