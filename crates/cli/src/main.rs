mod attachment_commands;
mod config_commands;

use std::path::{Path, PathBuf};

use {
    clap::{Parser, Subcommand},
    satchel_config::{LoggingConfig, SatchelConfig},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "satchel", about = "Satchel: chat attachment codec and validator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "SATCHEL_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed image attachments into a message as inline data URIs.
    Build(attachment_commands::MessageArgs),
    /// Validate inbound attachments and print the accepted ones as JSON.
    Parse(attachment_commands::MessageArgs),
    /// Print the MIME type detected from a file's leading bytes.
    Sniff {
        /// Raw file to inspect.
        path: PathBuf,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

/// Load the explicit config file, or discover one; then apply env overrides.
///
/// Called per command once tracing is up, so discovery and override warnings
/// reach the subscriber.
pub(crate) fn load_config(explicit: Option<&Path>) -> anyhow::Result<SatchelConfig> {
    let mut config = match explicit {
        Some(path) => satchel_config::load_config(path)?,
        None => satchel_config::discover_and_load(),
    };
    satchel_config::apply_env_overrides(&mut config);
    Ok(config)
}

/// The `[logging]` section used to set up tracing. Load failures fall back to
/// defaults here; the command that loads the full config reports them.
fn logging_config(explicit: Option<&Path>) -> LoggingConfig {
    match explicit {
        Some(path) => satchel_config::load_config(path)
            .map(|config| config.logging)
            .unwrap_or_default(),
        None => satchel_config::find_config_file()
            .and_then(|path| satchel_config::load_config(&path).ok())
            .map(|config| config.logging)
            .unwrap_or_default(),
    }
}

/// Initialise tracing. CLI flags win over the `[logging]` config section and
/// `RUST_LOG` wins over both.
fn init_telemetry(cli: &Cli, logging: &LoggingConfig) {
    let level = cli.log_level.as_deref().unwrap_or(&logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs || logging.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli, &logging_config(cli.config.as_deref()));
    debug!(version = env!("CARGO_PKG_VERSION"), "satchel starting");

    match cli.command {
        Commands::Build(args) => {
            let config = load_config(cli.config.as_deref())?;
            attachment_commands::build(&args, &config.attachments)
        },
        Commands::Parse(args) => {
            let config = load_config(cli.config.as_deref())?;
            attachment_commands::parse(&args, &config.attachments).await
        },
        Commands::Sniff { path } => attachment_commands::sniff(&path),
        Commands::Config { action } => config_commands::handle_config(action, cli.config),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::io::Write};

    fn config_file(body: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        tmp.write_all(body.as_bytes()).unwrap();
        tmp
    }

    #[test]
    fn logging_config_reads_explicit_file() {
        let tmp = config_file("[logging]\nlevel = \"debug\"\njson = true\n");
        let logging = logging_config(Some(tmp.path()));
        assert_eq!(logging.level, "debug");
        assert!(logging.json);
    }

    #[test]
    fn broken_config_still_allows_telemetry_setup() {
        let tmp = config_file("[attachments");
        assert_eq!(logging_config(Some(tmp.path())), LoggingConfig::default());
    }

    #[test]
    fn broken_explicit_config_is_reported_by_load() {
        let tmp = config_file("[attachments");
        let err = load_config(Some(tmp.path())).unwrap_err();
        assert!(err.to_string().contains("TOML"), "{err}");
    }
}
