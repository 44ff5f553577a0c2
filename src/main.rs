use bible_ref::cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("bible_ref=debug,info")
    } else {
        EnvFilter::new("bible_ref=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let catalog = cli::load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        cli::Commands::Parse(args) => {
            cli::parse::run(args, &catalog, cli.format, cli.verbose)?;
        }
        cli::Commands::Find(args) => {
            cli::find::run(args, &catalog, cli.format, cli.verbose)?;
        }
        cli::Commands::Render(args) => {
            cli::render::run(args, &catalog, cli.format, cli.verbose)?;
        }
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, &catalog, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
