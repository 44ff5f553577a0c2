use std::collections::HashSet;
use std::io::Read;
use std::ops::Range;
use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::catalog::store::Catalog;
use crate::cli::{reference_json, render, show_number, OutputFormat, ParserArgs};
use crate::core::reference::BibleReference;
use crate::utils::normalize::check_input_size;

#[derive(Args)]
pub struct FindArgs {
    /// Text file to scan; use '-' for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Sort results in canonical order instead of text order
    #[arg(long)]
    pub sort: bool,

    /// Report each distinct reference only once
    #[arg(long)]
    pub unique: bool,

    /// Render results in this naming scheme instead of the one they were written in
    #[arg(long, value_name = "SCHEME")]
    pub render_as: Option<String>,
}

/// One resolved reference and where it was found
struct Found {
    line: usize,
    span: Range<usize>,
    text: String,
    shape: &'static str,
    reference: BibleReference,
    rendered: String,
}

/// Execute find subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read, is too large, or the parser
/// cannot be built. Matches whose book cannot be resolved are logged and skipped.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: FindArgs,
    catalog: &Catalog,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let text = read_input(&args)?;
    let parser = catalog.parser(&args.parser.config())?;
    let target = args
        .render_as
        .as_deref()
        .map(|name| catalog.naming_scheme(name))
        .transpose()?;

    let lines = LineIndex::new(&text);
    let mut found = Vec::new();
    let mut skipped = 0usize;
    for m in parser.grammar().matches(&text) {
        let reference = match parser.resolve(&m) {
            Ok(reference) => reference,
            Err(e) => {
                warn!(text = m.text, error = %e, "skipping unresolved reference");
                skipped += 1;
                continue;
            }
        };
        let rendered = render(&reference, target.map(|scheme| &**scheme))?;
        found.push(Found {
            line: lines.line_of(m.start),
            span: m.span(),
            text: m.text.to_string(),
            shape: m.shape.kind(),
            reference,
            rendered,
        });
    }

    if args.unique {
        let mut seen = HashSet::new();
        found.retain(|f| seen.insert(f.reference.clone()));
    }

    if args.sort {
        let mut keyed = found
            .into_iter()
            .map(|f| Ok((f.reference.sort_tuple()?, f)))
            .collect::<Result<Vec<_>, crate::core::error::ReferenceError>>()?;
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        found = keyed.into_iter().map(|(_, f)| f).collect();
    }

    if verbose {
        eprintln!(
            "Found {} references ({} skipped) in {} bytes",
            found.len(),
            skipped,
            text.len()
        );
    }

    match format {
        OutputFormat::Text => print_text_results(&found),
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = found
                .iter()
                .map(|f| {
                    let mut json = reference_json(&f.reference, &f.rendered);
                    json["text"] = serde_json::json!(f.text);
                    json["line"] = serde_json::json!(f.line);
                    json["start"] = serde_json::json!(f.span.start);
                    json["end"] = serde_json::json!(f.span.end);
                    json["shape"] = serde_json::json!(f.shape);
                    json
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("line\tstart\tend\ttext\trendered\tbook\tchapter\tverse\trange");
            for f in &found {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    f.line,
                    f.span.start,
                    f.span.end,
                    f.text,
                    f.rendered,
                    f.reference.book().id(),
                    show_number(f.reference.chapter()),
                    show_number(f.reference.verse()),
                    f.reference.normalized_range()
                );
            }
        }
    }

    Ok(())
}

fn read_input(args: &FindArgs) -> anyhow::Result<String> {
    // Handle stdin
    let text = if args.input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if let Ok(metadata) = std::fs::metadata(&args.input) {
            if let Some(message) = usize::try_from(metadata.len())
                .ok()
                .and_then(check_input_size)
            {
                anyhow::bail!("{}: {message}", args.input.display());
            }
        }
        std::fs::read_to_string(&args.input)?
    };

    if let Some(message) = check_input_size(text.len()) {
        anyhow::bail!(message);
    }
    Ok(text)
}

/// Byte offsets of all line breaks, for mapping match offsets to lines
struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        Self {
            newlines: text.match_indices('\n').map(|(i, _)| i).collect(),
        }
    }

    /// 1-based line of a byte offset
    fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&newline| newline < offset) + 1
    }
}

fn print_text_results(found: &[Found]) {
    if found.is_empty() {
        println!("No references found");
        return;
    }

    let text_width = found
        .iter()
        .map(|f| f.text.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(
        "{:>5}  {:<text_w$}  {:<8} {}",
        "Line",
        "Text",
        "Book",
        "Rendered",
        text_w = text_width
    );
    println!("{}", "-".repeat(text_width + 30));
    for f in found {
        println!(
            "{:>5}  {:<text_w$}  {:<8} {}",
            f.line,
            f.text,
            f.reference.book().id().as_str(),
            f.rendered,
            text_w = text_width
        );
    }
}
