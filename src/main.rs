use std::path::Path;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "transly",
    version,
    about = "Translation, OCR, speech and chatbot backend for Nepali, Sinhala and English"
)]
struct Cli {
    /// Listen address (overrides [server] listen from settings)
    #[arg(short = 'a', long = "addr")]
    addr: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    transly::logging::init(cli.verbose)?;
    let settings = transly::settings::load_settings(cli.read_settings.as_deref().map(Path::new))?;
    let addr = cli.addr.unwrap_or_else(|| settings.listen.clone());
    transly::server::run_server(settings, addr).await
}
