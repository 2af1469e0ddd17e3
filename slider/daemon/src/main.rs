//! Slider Daemon - Reference Host for the Alert Slider Indicator
//!
//! Reads host events as newline-delimited JSON from stdin and feeds them to
//! the notification controller. The dialog and the ambient display are
//! stand-ins that write to the log, which makes the daemon handy for
//! replaying recorded event traces.
//!
//! # Usage
//!
//! ```bash
//! # Replay a trace with defaults
//! slider-daemon < events.jsonl
//!
//! # Shorter timeout, ambient pulse on, dark theme
//! slider-daemon --timeout-ms 1500 --pulse true --theme dark < events.jsonl
//!
//! # Verbose logging
//! RUST_LOG=debug slider-daemon < events.jsonl
//! ```
//!
//! # Input
//!
//! ```text
//! {"type":"slider_changed","position":0,"mode":0}
//! {"type":"configuration_changed","context":{"theme":"dark","rotation":90}}
//! ```
//!
//! # Shutdown
//!
//! EOF on stdin or Ctrl-C. Stdin is read on a blocking thread, so the
//! daemon is meant for piped input rather than an interactive terminal.

mod host;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{debug, error, info, warn};

use slider_core::{
    load_config_from_path, AmbientSetting, ConfigOverrides, ControllerError, ControllerHandle,
    NotificationController, Rotation,
};

use host::{parse_line, DisplayContext, LogAmbient, LogDialogFactory};

/// Slider Daemon - drives the alert slider indicator from JSON line events
#[derive(Parser, Debug)]
#[command(name = "slider-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "SLIDER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dismiss timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Pulse the ambient display on notifications
    #[arg(short = 'p', long, value_name = "BOOL")]
    pulse: Option<bool>,

    /// Controller inbox capacity
    #[arg(long, value_name = "N")]
    queue_capacity: Option<usize>,

    /// Initial theme (palette entry)
    #[arg(long, default_value = "light")]
    theme: String,

    /// Initial display rotation in degrees
    #[arg(long, default_value_t = 0)]
    rotation: u16,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            dismiss_timeout_ms: self.timeout_ms,
            queue_capacity: self.queue_capacity,
            pulse_on_notification: self.pulse,
        }
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("slider_daemon=info".parse()?)
                .add_directive("slider_core=info".parse()?),
        )
        .with_target(true)
        .init();
    Ok(())
}

/// Forward one input line to the controller
///
/// Only a stopped controller is an error; bad lines and a full inbox are
/// logged and skipped.
fn forward(handle: &ControllerHandle<DisplayContext>, line: &str) -> Result<(), ControllerError> {
    let event = match parse_line(line) {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(()),
        Err(e) => {
            warn!(error = %e, line, "Skipping unparseable input line");
            return Ok(());
        }
    };

    debug!(kind = event.kind(), "Host event");
    match handle.submit(event) {
        Ok(_) | Err(ControllerError::QueueFull) => Ok(()),
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    info!("Slider Daemon starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config =
        load_config_from_path(args.config.clone()).context("Failed to load configuration")?;
    args.overrides()
        .apply(&mut config)
        .context("Invalid command line overrides")?;

    info!(
        source = %config.source(),
        timeout = ?config.controller.dismiss_timeout,
        pulse = config.pulse_on_notification,
        "Configuration loaded"
    );

    let rotation = Rotation::try_from(args.rotation).map_err(anyhow::Error::msg)?;
    let context = DisplayContext::new(args.theme, rotation);
    let ambient = LogAmbient::new(AmbientSetting::new(config.pulse_on_notification));

    let handle = NotificationController::spawn(
        LogDialogFactory::default(),
        ambient,
        &context,
        config.controller,
    )
    .context("Failed to create indicator resources")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if let Err(e) = forward(&handle, &line) {
                            error!(error = %e, "Controller stopped unexpectedly");
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("Input closed, shutting down");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read input");
                        break;
                    }
                }
            }
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    handle.shutdown().await;
    info!("Slider daemon stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_args_map_to_overrides() {
        let args = Args::parse_from([
            "slider-daemon",
            "--timeout-ms",
            "1500",
            "--pulse",
            "true",
            "--queue-capacity",
            "8",
        ]);
        let overrides = args.overrides();

        assert_eq!(overrides.dismiss_timeout_ms, Some(1500));
        assert_eq!(overrides.queue_capacity, Some(8));
        assert_eq!(overrides.pulse_on_notification, Some(true));
        assert_eq!(args.theme, "light");
        assert_eq!(args.rotation, 0);
    }

    #[test]
    fn test_args_default_to_no_overrides() {
        let args = Args::parse_from(["slider-daemon", "--theme", "dark", "--rotation", "180"]);
        let overrides = args.overrides();

        assert_eq!(overrides.dismiss_timeout_ms, None);
        assert_eq!(overrides.queue_capacity, None);
        assert_eq!(overrides.pulse_on_notification, None);
        assert_eq!(args.theme, "dark");
        assert_eq!(args.rotation, 180);
    }

    #[tokio::test]
    async fn test_forward_skips_bad_lines() {
        let handle = NotificationController::spawn(
            LogDialogFactory::default(),
            LogAmbient::new(AmbientSetting::new(false)),
            &DisplayContext::new("light", Rotation::Deg0),
            slider_core::ControllerConfig::default(),
        )
        .unwrap();

        forward(&handle, "garbage").unwrap();
        forward(&handle, "").unwrap();
        forward(&handle, r#"{"type":"slider_changed","position":1,"mode":-1}"#).unwrap();
        forward(&handle, r#"{"type":"slider_changed","position":1,"mode":2}"#).unwrap();

        let status = handle.status().await.unwrap();
        assert_eq!(status.stats.updates, 1);
        assert!(status.showing);

        handle.shutdown().await;
        assert_eq!(
            forward(&handle, r#"{"type":"slider_changed","mode":0}"#),
            Err(ControllerError::Closed)
        );
    }
}
