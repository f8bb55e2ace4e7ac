//! Debug tracing for development diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=layout=debug` - structural diffs after each action
//! - `RUST_LOG=flexdock::view=trace` - drop resolution
//!
//! # Log Files
//!
//! Logs are written to `~/.config/flexdock/logs/flexdock.log` with daily
//! rotation, always at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_PREFIX;
use crate::model::{Model, WindowId};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). A log directory that
/// cannot be created only disables the file layer.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // a host may already have installed a subscriber
    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        tracing::debug!("tracing subscriber already installed: {}", e);
    }
}

/// Structural counts of a model, for before/after diffs
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub rows: usize,
    pub tabsets: usize,
    pub tabs: usize,
    pub border_tabs: usize,
    pub windows: usize,
    pub z_order: Vec<WindowId>,
    pub flyout: Option<String>,
}

impl LayoutSnapshot {
    pub fn from_model(model: &Model) -> Self {
        let (mut rows, mut tabsets, mut tabs) = (0, 0, 0);
        for window in model.all_windows() {
            rows += window.root.rows().len();
            let sets = window.root.tabsets();
            tabsets += sets.len();
            tabs += sets.iter().map(|ts| ts.children.len()).sum::<usize>();
        }
        Self {
            rows,
            tabsets,
            tabs,
            border_tabs: model.borders.iter().map(|b| b.children.len()).sum(),
            windows: model.windows.len(),
            z_order: model.float_z_order.clone(),
            flyout: model.flyout().map(|(_, tab)| tab.id.as_str().to_string()),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &LayoutSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        let counts = [
            ("rows", self.rows, other.rows),
            ("tabsets", self.tabsets, other.tabsets),
            ("tabs", self.tabs, other.tabs),
            ("border tabs", self.border_tabs, other.border_tabs),
            ("windows", self.windows, other.windows),
        ];
        for (name, before, after) in counts {
            if before != after {
                changes.push(format!("{}: {} → {}", name, before, after));
            }
        }
        if self.z_order != other.z_order {
            let order: Vec<&str> = other.z_order.iter().map(WindowId::as_str).collect();
            changes.push(format!("z-order: [{}]", order.join(", ")));
        }
        if self.flyout != other.flyout {
            changes.push(format!(
                "flyout: {} → {}",
                self.flyout.as_deref().unwrap_or("none"),
                other.flyout.as_deref().unwrap_or("none")
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
