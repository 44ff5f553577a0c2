//! Command-line interface for bible-ref.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **parse**: Parse references given on the command line
//! - **find**: Find all references in a text file or stdin
//! - **render**: Translate a reference into another naming scheme
//! - **catalog**: List, show, or export canons and naming schemes
//!
//! ## Usage
//!
//! ```text
//! # Parse a reference written with German abbreviations
//! bible-ref parse "Röm 3,22"
//!
//! # Accept English abbreviations too, German first
//! bible-ref parse "Rom 3:22" --scheme RGG_abbr --scheme SBL_abbr
//!
//! # Find references in a sermon, in canonical order
//! bible-ref find predigt.txt --sort
//!
//! # Pipe text through stdin, JSON output for scripting
//! cat predigt.txt | bible-ref find - --format json
//!
//! # Translate between naming schemes
//! bible-ref render "1Kor 13,4" --render-as Luther84
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::catalog::store::{Catalog, ParserConfig};
use crate::core::naming::NamingScheme;
use crate::core::reference::BibleReference;

pub mod catalog;
pub mod find;
pub mod parse;
pub mod render;

#[derive(Parser)]
#[command(name = "bible-ref")]
#[command(version)]
#[command(about = "Parse, find and render Bible references")]
#[command(
    long_about = "bible-ref recognizes Bible references such as \"Röm 3,22\" or \"1 Cor 13:4\" in free text.\n\nReferences are resolved through configurable naming schemes (German and English book names and abbreviations ship with the tool) and can be:\n- Ordered by a canon (ecumenical, King James, Hebrew Bible)\n- Rendered in any other naming scheme\n- Exported as JSON or TSV for further processing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to a custom catalog directory or exported catalog JSON
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse references given as arguments
    Parse(parse::ParseArgs),

    /// Find all references in a text
    Find(find::FindArgs),

    /// Render a reference in another naming scheme
    Render(render::RenderArgs),

    /// Inspect or export the catalog
    Catalog(catalog::CatalogArgs),
}

/// Options selecting which parser to build
#[derive(Args, Debug, Clone)]
pub struct ParserArgs {
    /// Naming scheme to recognize; repeat for several, in priority order
    /// [default: RGG_abbr]
    #[arg(short, long = "scheme", value_name = "SCHEME")]
    pub schemes: Vec<String>,

    /// Canon used to order books
    #[arg(long, default_value = "default")]
    pub canon: String,
}

impl ParserArgs {
    /// Parser configuration, falling back to the default schemes
    #[must_use]
    pub fn config(&self) -> ParserConfig {
        let naming_schemes = if self.schemes.is_empty() {
            ParserConfig::default().naming_schemes
        } else {
            self.schemes.clone()
        };
        ParserConfig {
            naming_schemes,
            canon: self.canon.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load the catalog given with `--catalog`, or the embedded one
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::load_from_path(path)?,
        None => Catalog::load_embedded()?,
    };
    tracing::debug!(
        canons = catalog.canon_names().count(),
        naming_schemes = catalog.naming_scheme_names().count(),
        "catalog ready"
    );
    Ok(catalog)
}

/// Render a reference in `scheme`, or in its own scheme if none is given
pub(crate) fn render(
    reference: &BibleReference,
    scheme: Option<&NamingScheme>,
) -> anyhow::Result<String> {
    match scheme {
        Some(scheme) => Ok(reference.render_using(scheme)?),
        None => Ok(reference.to_string()),
    }
}

/// JSON description of a reference, shared by `parse` and `find`
pub(crate) fn reference_json(reference: &BibleReference, rendered: &str) -> serde_json::Value {
    serde_json::json!({
        "rendered": rendered,
        "book": reference.book().id().as_str(),
        "chapter": reference.chapter(),
        "verse": reference.verse(),
        "range": reference.normalized_range(),
        "naming_scheme": reference.naming_scheme().name(),
        "canon": reference.book().canon().name(),
        "sort_key": reference.sort_key().ok(),
    })
}

/// Render an optional number for text and TSV output
pub(crate) fn show_number(n: Option<u32>) -> String {
    n.map_or_else(|| "-".to_string(), |n| n.to_string())
}
