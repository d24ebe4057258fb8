use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use varconf_client::config::validation::validate_config;
use varconf_client::config::{read_config, ClientConfig, ConfigError};
use varconf_client::observability::logging;
use varconf_client::{Client, RetryPolicy, StopHandle};

#[derive(Parser)]
#[command(name = "varconf-cli")]
#[command(about = "Query and watch a varconf configuration service", long_about = None)]
struct Cli {
    /// Base URL of the configuration service
    #[arg(short, long)]
    url: Option<String>,

    /// Application access token
    #[arg(short, long)]
    token: Option<String>,

    /// TOML configuration file; --url and --token override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every configuration entry of the application
    Get,
    /// Print a single configuration entry
    GetKey {
        key: String,
        /// Wait for a change after --last-index
        #[arg(long)]
        long_pull: bool,
        #[arg(long, default_value_t = 0)]
        last_index: u64,
    },
    /// Follow the given keys and print every update until Ctrl-C
    Watch {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Fixed retry delay in seconds, overriding the configured policy
        #[arg(long)]
        retry_delay: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let _ = logging::init(&format!(
        "varconf_client={level},varconf_cli={level}",
        level = config.observability.log_level
    ));

    match cli.command {
        Commands::Get => {
            let client = Client::from_config(&config)?;
            let snapshot = client.get_app_config(false, 0).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::GetKey {
            key,
            long_pull,
            last_index,
        } => {
            let client = Client::from_config(&config)?;
            let snapshot = client.get_key_config(&key, long_pull, last_index).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Watch { keys, retry_delay } => {
            let retry = match retry_delay {
                Some(secs) => RetryPolicy::fixed_secs(secs),
                None => RetryPolicy::from(&config.retry),
            };
            let client = Client::from_config(&config)?
                .with_listener(|key, value, ts| println!("{key} = {value} (timestamp {ts})"));

            let mut target: BTreeMap<String, String> =
                keys.into_iter().map(|key| (key, String::new())).collect();

            let stop = StopHandle::new();
            let stopper = stop.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received Ctrl-C, stopping after the current poll");
                    stopper.stop();
                }
            });

            let report = client.watch(&mut target, retry, stop.signal()).await;
            eprintln!(
                "stopped at index {} ({} snapshots applied, {} failures)",
                report.last_index, report.snapshots_applied, report.failures
            );
        }
    }

    Ok(())
}

/// Merge the optional config file with `--url`/`--token`, then validate once.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(token) = &cli.token {
        config.token = token.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("varconf-cli").chain(args.iter().copied())).unwrap()
    }

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_flags_only() {
        let cli = parse(&["--url", "http://127.0.0.1:8088", "--token", "abc", "get"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.url, "http://127.0.0.1:8088");
        assert_eq!(config.token, "abc");
        assert_eq!(config.retry.delay_secs, 5);
    }

    #[test]
    fn test_file_only() {
        let file = config_file("url = \"http://conf:8088\"\ntoken = \"from-file\"\n[retry]\ndelay_secs = 2\n");
        let path = file.path().to_str().unwrap();

        let config = resolve_config(&parse(&["--config", path, "get"])).unwrap();
        assert_eq!(config.url, "http://conf:8088");
        assert_eq!(config.token, "from-file");
        assert_eq!(config.retry.delay_secs, 2);
    }

    #[test]
    fn test_flags_complete_partial_file() {
        let file = config_file("url = \"http://127.0.0.1:1\"\n");
        let path = file.path().to_str().unwrap();

        let config = resolve_config(&parse(&["--config", path, "--token", "abc", "get"])).unwrap();
        assert_eq!(config.url, "http://127.0.0.1:1");
        assert_eq!(config.token, "abc");
    }

    #[test]
    fn test_flags_override_file() {
        let file = config_file("url = \"http://old:1\"\ntoken = \"old\"\n");
        let path = file.path().to_str().unwrap();

        let cli = parse(&["--config", path, "--url", "http://new:2", "watch", "app.name"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.url, "http://new:2");
        assert_eq!(config.token, "old");
    }

    #[test]
    fn test_missing_token_still_rejected() {
        let file = config_file("url = \"http://127.0.0.1:1\"\n");
        let path = file.path().to_str().unwrap();

        match resolve_config(&parse(&["--config", path, "get"])) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "token");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
