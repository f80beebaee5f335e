use clap::Parser;
use roundtable::core::config;
use roundtable::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "roundtable", about = "Terminal client for the IT department meeting room")]
struct Args {
    /// Base URL of the meeting backend (e.g. http://127.0.0.1:5000)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Request timeout in seconds for backend calls
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to roundtable.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("roundtable.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default config: {}", e);
            config::RoundtableConfig::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        config::CliOverrides {
            base_url: args.base_url.as_deref(),
            timeout_secs: args.timeout,
        },
    );

    log::info!(
        "Roundtable starting up against {} (timeout {}s)",
        resolved.base_url,
        resolved.request_timeout.as_secs()
    );

    tui::run(resolved)
}
