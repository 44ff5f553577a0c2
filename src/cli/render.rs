use anyhow::Context;
use clap::Args;

use crate::catalog::store::{Catalog, ParserConfig};
use crate::cli::{OutputFormat, ParserArgs};

#[derive(Args)]
pub struct RenderArgs {
    /// Reference to translate, e.g. "1Kor 13,4"
    #[arg(required = true)]
    pub reference: String,

    /// Naming scheme to render in
    #[arg(long, required = true, value_name = "SCHEME")]
    pub render_as: String,

    #[command(flatten)]
    pub parser: ParserArgs,
}

/// Execute render subcommand
///
/// Without `--scheme`, every naming scheme of the catalog is recognized, in
/// catalog order.
///
/// # Errors
///
/// Returns an error if the reference cannot be parsed or the target scheme
/// has no name for its book.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: RenderArgs,
    catalog: &Catalog,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let config = if args.parser.schemes.is_empty() {
        ParserConfig {
            naming_schemes: catalog.naming_scheme_names().map(String::from).collect(),
            canon: args.parser.canon.clone(),
        }
    } else {
        args.parser.config()
    };
    let parser = catalog.parser(&config)?;
    let target = catalog.naming_scheme(&args.render_as)?;

    let reference = parser
        .parse(&args.reference)
        .with_context(|| format!("Cannot parse '{}'", args.reference))?;
    let rendered = reference.render_using(target).with_context(|| {
        format!(
            "Cannot render '{}' in naming scheme '{}'",
            args.reference,
            target.name()
        )
    })?;

    if verbose {
        eprintln!(
            "Parsed '{}' as {:?} using naming scheme '{}'",
            args.reference,
            reference,
            reference.naming_scheme().name()
        );
    }

    match format {
        OutputFormat::Text => println!("{rendered}"),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "input": args.reference,
                "rendered": rendered,
                "from_scheme": reference.naming_scheme().name(),
                "to_scheme": target.name(),
                "book": reference.book().id().as_str(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("input\trendered\tfrom_scheme\tto_scheme");
            println!(
                "{}\t{}\t{}\t{}",
                args.reference,
                rendered,
                reference.naming_scheme().name(),
                target.name()
            );
        }
    }

    Ok(())
}
