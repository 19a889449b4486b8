use anyhow::{Context, Result};
use axquery::{AxConfig, AxThread};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

mod commands;
mod logging;

use commands::run::RunCommand;
use commands::serve::ServeCommand;

#[derive(Parser, Debug)]
#[command(
    name = "axquery",
    author,
    version,
    about = "Query and drive desktop applications through the accessibility tree"
)]
struct Cli {
    /// JSON file with engine limits (see AxConfig)
    #[arg(long, global = true, env = "AXQUERY_CONFIG")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, env = "AXQUERY_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Deepest tree level searched and collected
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Default cap on elements returned by collectAll
    #[arg(long, global = true)]
    max_elements: Option<usize>,

    /// Retry delay for lazily populated attributes, in milliseconds
    #[arg(long, global = true)]
    retry_delay_ms: Option<u64>,

    /// Attach the reasoning log to every response and log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer newline-delimited JSON commands from stdin (default)
    Serve(ServeCommand),
    /// Run a single command given inline or in a file
    Run(RunCommand),
}

impl Cli {
    /// Defaults, then the config file or environment, then flags.
    fn engine_config(&self) -> Result<AxConfig> {
        let mut config = match &self.config {
            Some(path) => AxConfig::load(path)?,
            None => AxConfig::from_env(),
        };
        if let Some(depth) = self.max_depth {
            config.max_search_depth = depth;
            config.max_collect_depth = depth;
        }
        if let Some(max) = self.max_elements {
            config.max_collect_elements = max;
        }
        if let Some(ms) = self.retry_delay_ms {
            config.attribute_retry_delay = Duration::from_millis(ms);
        }
        if self.debug {
            config.debug_logging = true;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_guard = logging::init_logging(cli.log_file.as_deref(), cli.debug);

    let config = cli.engine_config()?;
    info!(
        "axquery {} (max depth {}, max elements {})",
        env!("CARGO_PKG_VERSION"),
        config.max_search_depth,
        config.max_collect_elements
    );

    let ax = AxThread::spawn(move || axquery::platform_dispatcher(config))
        .context("failed to start the accessibility thread")?;

    let code = match cli.command {
        Some(Command::Run(run)) => run.execute(&ax).await?,
        Some(Command::Serve(serve)) => serve.execute(&ax).await?,
        None => ServeCommand::default().execute(&ax).await?,
    };

    ax.shutdown();
    if code != 0 {
        drop(log_guard);
        std::process::exit(code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"max_collect_elements": 50, "max_search_depth": 12}"#,
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "axquery",
            "--config",
            path.as_str(),
            "--max-depth",
            "4",
            "--debug",
            "serve",
        ])
        .unwrap();
        let config = cli.engine_config().unwrap();

        assert_eq!(config.max_search_depth, 4);
        assert_eq!(config.max_collect_depth, 4);
        assert_eq!(config.max_collect_elements, 50);
        assert!(config.debug_logging);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["axquery", "--config", "/nonexistent/axquery.json"]).unwrap();
        assert!(cli.engine_config().is_err());
    }

    #[test]
    fn test_run_parses_inline_command() {
        let cli = Cli::try_parse_from(["axquery", "run", "--pretty", r#"{"command":"ping"}"#])
            .unwrap();
        assert!(matches!(cli.command, Some(Command::Run(_))));
    }
}
