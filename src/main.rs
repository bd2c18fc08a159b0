//! didery-dash - a terminal dashboard for a didery server
//!
//! Shows the server's public key histories, encrypted blobs, relays and
//! errors as searchable, sortable tables. Uses the Component Architecture
//! pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::{Backend, HttpBackend};
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "didery-dash", version, about = "Terminal dashboard for a didery server")]
struct Cli {
    /// Server base URL, e.g. http://127.0.0.1:8080
    #[arg(long)]
    url: Option<String>,

    /// Config file (default: ~/.didery-dash/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum rows shown per table
    #[arg(long)]
    max_visible: Option<usize>,

    /// Seconds between automatic refreshes; 0 disables
    #[arg(long, value_name = "SECS")]
    auto_refresh: Option<u64>,

    /// Log file (default: ~/.didery-dash/dashboard.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective config back to the config file
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Command-line flags win over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(max_visible) = self.max_visible {
            config.max_visible = max_visible;
        }
        if let Some(secs) = self.auto_refresh {
            config.auto_refresh_secs = secs;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    init_logging(cli.log_file.clone())?;
    info!(url = %config.base_url, "starting dashboard");

    if cli.save_config {
        let path = config.save(cli.config.as_deref())?;
        info!(path = %path.display(), "config saved");
    }

    let backend: Arc<dyn Backend> = Arc::new(
        HttpBackend::new(&config.base_url, config.request_timeout())
            .context("Could not create HTTP client")?,
    );
    let mut app = App::new(&config, backend);

    // Setup terminal
    let mut tui = Tui::new(config.tick_rate())?;
    tui.enter()?;

    app.init()?;

    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        error!(error = %err, "dashboard stopped");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!("dashboard closed");
    Ok(())
}

/// Route tracing output to a file; the terminal belongs to the UI
fn init_logging(log_file: Option<PathBuf>) -> Result<()> {
    let path = match log_file.or_else(|| Config::config_dir().map(|d| d.join("dashboard.log"))) {
        Some(path) => path,
        None => return Ok(()),
    };
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!(error = %e, "draw failed");
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                debug!(action = %a, "dispatch");
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "didery-dash",
            "--url",
            "http://relay:9000",
            "--auto-refresh",
            "0",
            "--max-visible",
            "5",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.base_url, "http://relay:9000");
        assert_eq!(config.auto_refresh(), None);
        assert_eq!(config.max_visible, 5);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_missing_flags_keep_config() {
        let cli = Cli::parse_from(["didery-dash"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
    }
}
