use {anyhow::Result, clap::Subcommand, std::path::PathBuf};

use satchel_config::validate::{self, Severity, ValidationResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// Config file to check (defaults to the discovered one).
        path: Option<PathBuf>,
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the effective configuration as TOML.
    Show,
}

pub fn handle_config(action: ConfigAction, explicit: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Check { path, verbose } => check(path.or(explicit), verbose),
        ConfigAction::Show => {
            let config = crate::load_config(explicit.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        },
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(path: Option<PathBuf>, verbose: bool) -> Result<()> {
    let result = validate::validate(path.as_deref());
    if report(&result, verbose) > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Print diagnostics to stderr and return the number of errors.
fn report(result: &ValidationResult, verbose: bool) -> usize {
    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults.\n");
    }

    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Info => CYAN,
        };

        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{}{RESET} {}", d.severity, d.message);
        } else {
            eprintln!(
                "  {BOLD}{color}{}{RESET} {}: {}",
                d.severity, d.path, d.message
            );
        }
        shown += 1;
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    errors
}
