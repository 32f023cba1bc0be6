use std::path::PathBuf;

use clap::Parser;

use syndic::build::build_site;
use syndic::config::Config;

/// Builds the site's syndication outputs (RSS feed and sitemap).
#[derive(Parser)]
#[command(name = "syndic", version, about)]
struct Args {
    /// Directory from which to search for `syndic.yaml`; defaults to the
    /// current directory.
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Directory into which `rss.xml` and `sitemap.xml` are written.
    #[arg(short, long, default_value = "public")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let project = match args.project {
        Some(directory) => directory,
        None => std::env::current_dir()?,
    };
    let config = Config::from_directory(&project)?;
    build_site(&config, &args.output)?;
    Ok(())
}
