use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chatpane::backend::DEMO_SCRIPT;
use chatpane::ui::terminal_guard::install_panic_hook;
use chatpane::{util, App, Config};
use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Streaming chat panel with mouse selection", long_about = None)]
struct Cli {
    /// Data directory (defaults to ~/.chatpane)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Markdown file to stream as the reply (built-in demo otherwise)
    #[arg(long)]
    script: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir);

    // Initialize logging to file (~/.chatpane/logs/chatpane.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let script = match cli.script {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => DEMO_SCRIPT.to_string(),
    };

    let config = Config::load();
    install_panic_hook();

    let mut app = App::new(config, script);
    app.run().await
}
