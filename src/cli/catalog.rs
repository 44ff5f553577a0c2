use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::Catalog;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all canons and naming schemes in the catalog
    List,

    /// Show the book names of a naming scheme
    Names {
        /// Naming scheme (e.g., "Luther84")
        #[arg(required = true)]
        scheme: String,

        /// Order names by this canon instead of the scheme's own order
        #[arg(long)]
        canon: Option<String>,
    },

    /// Show the book order of a canon
    Canon {
        /// Canon name (e.g., "KingJames")
        #[arg(required = true)]
        name: String,
    },

    /// Export the catalog to a JSON file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if a named canon or scheme does not exist or the export
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: CatalogArgs,
    catalog: &Catalog,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List => run_list(catalog, format, verbose),
        CatalogCommands::Names { scheme, canon } => {
            run_names(catalog, &scheme, canon.as_deref(), format)
        }
        CatalogCommands::Canon { name } => run_canon(catalog, &name, format),
        CatalogCommands::Export { output } => run_export(catalog, output),
    }
}

fn run_list(catalog: &Catalog, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        eprintln!(
            "Catalog with {} canons and {} naming schemes",
            catalog.canon_names().count(),
            catalog.naming_scheme_names().count()
        );
    }

    match format {
        OutputFormat::Text => {
            let name_width = catalog
                .canon_names()
                .chain(catalog.naming_scheme_names())
                .map(str::len)
                .max()
                .unwrap_or(4)
                .max(4);

            println!("Canons\n");
            println!("{:<name_w$} {:>5}  Description", "Name", "Books", name_w = name_width);
            println!("{}", "-".repeat(name_width + 20));
            for name in catalog.canon_names() {
                let canon = catalog.canon(name)?;
                println!(
                    "{:<name_w$} {:>5}  {}",
                    name,
                    canon.len(),
                    catalog.canon_description(name).unwrap_or(""),
                    name_w = name_width
                );
            }

            println!("\nNaming Schemes\n");
            println!(
                "{:<name_w$} {:>5}  {:<9} {:<6} Description",
                "Name",
                "Books",
                "Ordinal",
                "Verse",
                name_w = name_width
            );
            println!("{}", "-".repeat(name_width + 40));
            for name in catalog.naming_scheme_names() {
                let scheme = catalog.naming_scheme(name)?;
                println!(
                    "{:<name_w$} {:>5}  {:<9} {:<6} {}",
                    name,
                    scheme.len(),
                    format!("{:?}", scheme.ordinal_delimiter()),
                    format!("{:?}", scheme.verse_delimiter()),
                    catalog.naming_scheme_description(name).unwrap_or(""),
                    name_w = name_width
                );
            }
        }
        OutputFormat::Json => {
            let canons = catalog
                .canon_names()
                .map(|name| -> anyhow::Result<serde_json::Value> {
                    Ok(serde_json::json!({
                        "name": name,
                        "book_count": catalog.canon(name)?.len(),
                        "description": catalog.canon_description(name),
                    }))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let naming_schemes = catalog
                .naming_scheme_names()
                .map(|name| -> anyhow::Result<serde_json::Value> {
                    let scheme = catalog.naming_scheme(name)?;
                    Ok(serde_json::json!({
                        "name": name,
                        "book_count": scheme.len(),
                        "ordinal_delimiter": scheme.ordinal_delimiter(),
                        "verse_delimiter": scheme.verse_delimiter(),
                        "description": catalog.naming_scheme_description(name),
                    }))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let output = serde_json::json!({
                "canons": canons,
                "naming_schemes": naming_schemes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("kind\tname\tbook_count\tdescription");
            for name in catalog.canon_names() {
                println!(
                    "canon\t{}\t{}\t{}",
                    name,
                    catalog.canon(name)?.len(),
                    catalog.canon_description(name).unwrap_or("")
                );
            }
            for name in catalog.naming_scheme_names() {
                println!(
                    "naming_scheme\t{}\t{}\t{}",
                    name,
                    catalog.naming_scheme(name)?.len(),
                    catalog.naming_scheme_description(name).unwrap_or("")
                );
            }
        }
    }

    Ok(())
}

fn run_names(
    catalog: &Catalog,
    scheme_name: &str,
    canon_name: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let scheme = catalog.naming_scheme(scheme_name)?;
    let canon = canon_name.map(|name| catalog.canon(name)).transpose()?;
    let names = scheme.names_ordered_by(canon.map(|canon| &**canon));

    match format {
        OutputFormat::Text => {
            match canon {
                Some(canon) => println!(
                    "Naming scheme: {} ({} names, ordered by {})\n",
                    scheme.name(),
                    names.len(),
                    canon.name()
                ),
                None => println!("Naming scheme: {} ({} names)\n", scheme.name(), names.len()),
            }
            for (i, name) in names.iter().enumerate() {
                println!("{:>4}  {}", i + 1, name);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "naming_scheme": scheme.name(),
                "canon": canon.map(|canon| canon.name()),
                "names": names,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("position\tname");
            for (i, name) in names.iter().enumerate() {
                println!("{}\t{}", i + 1, name);
            }
        }
    }

    Ok(())
}

fn run_canon(catalog: &Catalog, name: &str, format: OutputFormat) -> anyhow::Result<()> {
    let canon = catalog.canon(name)?;

    match format {
        OutputFormat::Text => {
            println!("Canon: {} ({} books)", canon.name(), canon.len());
            if let Some(description) = catalog.canon_description(name).filter(|d| !d.is_empty()) {
                println!("{description}");
            }
            println!();
            for (i, id) in canon.iter().enumerate() {
                println!("{:>4}  {}", i + 1, id);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": canon.name(),
                "description": catalog.canon_description(name),
                "books": canon.book_ids(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("position\tbook");
            for (i, id) in canon.iter().enumerate() {
                println!("{}\t{}", i + 1, id);
            }
        }
    }

    Ok(())
}

fn run_export(catalog: &Catalog, output: PathBuf) -> anyhow::Result<()> {
    let json = catalog.to_json()?;
    std::fs::write(&output, json)?;

    println!(
        "Exported {} canons and {} naming schemes to {}",
        catalog.canon_names().count(),
        catalog.naming_scheme_names().count(),
        output.display()
    );

    Ok(())
}
