//! x11wininfo - print the id, title and class of the focused X11 window.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use x11wininfo::backend::{WindowQuery, X11Source};
use x11wininfo::config::Config;
use x11wininfo::output::{self, OutputMode};

/// Overrides the config file location.
const CONFIG_ENV: &str = "X11WININFO_CONFIG";

/// Log filter directives (e.g. `x11wininfo=debug`).
const LOG_ENV: &str = "X11WININFO_LOG";

/// Print the id, title, instance and class of the focused X11 window.
#[derive(Parser, Debug)]
#[command(name = "x11wininfo")]
#[command(version, about, long_about = None)]
struct Args {
    /// Output mode (default: text, or `mode` from the config file).
    #[arg(short = 'm', value_name = "MODE", value_enum)]
    mode: Option<OutputMode>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        Err(e) => e.exit(),
    };

    if let Err(e) = init_logging() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    match run(&args).and_then(|rendered| write_output(&rendered)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging to stderr, quiet unless `X11WININFO_LOG` says otherwise.
fn init_logging() -> Result<()> {
    let filter = match env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::try_new(directives).context("Invalid X11WININFO_LOG")?,
        Err(_) => EnvFilter::new("x11wininfo=warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

/// Query the focused window and render it. Nothing is printed here, so a
/// failure leaves stdout empty.
fn run(args: &Args) -> Result<Vec<u8>> {
    let config_path = env::var_os(CONFIG_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    let config = Config::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    let mode = args.mode.unwrap_or(config.mode);
    debug!(
        "Output mode: {}, property reads: {:?}",
        mode.as_str(),
        config.property_read
    );

    let source = X11Source::connect()?;
    let info = WindowQuery::new(&source, config.property_read).focused_window_info()?;
    drop(source);

    output::render(&info, mode).context("Failed to render output")
}

/// Write rendered output to stdout as-is; title bytes need not be UTF-8.
fn write_output(rendered: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered)
        .and_then(|()| stdout.flush())
        .context("Failed to write output")
}
