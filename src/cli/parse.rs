use anyhow::Context;
use clap::Args;

use crate::catalog::store::Catalog;
use crate::cli::{reference_json, render, show_number, OutputFormat, ParserArgs};
use crate::core::reference::BibleReference;

#[derive(Args)]
pub struct ParseArgs {
    /// References to parse, e.g. "Röm 3,22"
    #[arg(required = true)]
    pub references: Vec<String>,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Render results in this naming scheme instead of the one they were written in
    #[arg(long, value_name = "SCHEME")]
    pub render_as: Option<String>,
}

/// Execute parse subcommand
///
/// Every argument must start with a reference; text after it is ignored.
///
/// # Errors
///
/// Returns an error if the parser cannot be built or an argument cannot be parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ParseArgs,
    catalog: &Catalog,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let parser = catalog.parser(&args.parser.config())?;
    let target = args
        .render_as
        .as_deref()
        .map(|name| catalog.naming_scheme(name))
        .transpose()?;

    if verbose {
        eprintln!(
            "Recognizing {} book names from {}",
            parser.grammar().book_names().len(),
            args.parser.config().naming_schemes.join(", ")
        );
    }

    let mut parsed: Vec<(&str, BibleReference, String)> =
        Vec::with_capacity(args.references.len());
    for text in &args.references {
        let reference = parser
            .parse(text)
            .with_context(|| format!("Cannot parse '{text}'"))?;
        let rendered = render(&reference, target.map(|scheme| &**scheme))?;
        parsed.push((text.as_str(), reference, rendered));
    }

    match format {
        OutputFormat::Text => {
            for (i, (text, reference, rendered)) in parsed.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{text}");
                println!("  Rendered: {rendered}");
                println!("  Book:     {}", reference.book().id());
                println!("  Chapter:  {}", show_number(reference.chapter()));
                println!("  Verse:    {}", show_number(reference.verse()));
                println!("  Range:    {}", reference.range());
                match reference.sort_key() {
                    Ok(key) => println!("  Sort key: {key:#08x}"),
                    Err(e) => println!("  Sort key: - ({e})"),
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = parsed
                .iter()
                .map(|(text, reference, rendered)| {
                    let mut json = reference_json(reference, rendered);
                    json["input"] = serde_json::json!(text);
                    json
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("input\trendered\tbook\tchapter\tverse\trange\tsort_key");
            for (text, reference, rendered) in &parsed {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    text,
                    rendered,
                    reference.book().id(),
                    show_number(reference.chapter()),
                    show_number(reference.verse()),
                    reference.normalized_range(),
                    show_number(reference.sort_key().ok())
                );
            }
        }
    }

    Ok(())
}
