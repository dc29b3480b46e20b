use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use usertui::app::{self, App};
use usertui::config::{Config, Overrides};
use usertui::logging;
use usertui::users::fetcher::GraphQlUserSource;
use usertui::users::{FieldSet, UserSource};

#[derive(Parser, Debug)]
#[command(name = "usertui")]
#[command(about = "List users from a GraphQL endpoint in your terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/usertui/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GraphQL endpoint URL (overrides USERTUI_ENDPOINT and the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Which user fields to query
    #[arg(short, long, value_enum)]
    fields: Option<FieldSet>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run the query once, print the result and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(
        cli.config.as_deref(),
        Overrides {
            endpoint: cli.endpoint,
            fields: cli.fields,
            log_file: cli.log_file,
        },
    )?;
    logging::init(config.log_file.as_deref())?;

    tracing::info!(endpoint = %config.endpoint, fields = ?config.fields, "starting usertui");
    let source: Arc<dyn UserSource> = Arc::new(GraphQlUserSource::from_config(&config)?);

    if cli.once {
        let view = app::run_once(source, config.title.clone(), config.fields).await;
        for line in view.plain_lines() {
            println!("{}", line);
        }
        return Ok(if view.is_failed() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    let mut terminal = ratatui::init();
    let mut app = App::from_config(&config, source);
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    result.map(|()| ExitCode::SUCCESS)
}
