//! Command-line front end
//!
//! Supports:
//! - Laying out a document (after replaying actions) and printing node rects
//! - Resolving the drop target for a drag at a point
//! - Validating a document and re-emitting it in canonical form

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::config::EngineConfig;
use crate::messages::Action;
use crate::model::{NodeId, Rect, WindowId};
use crate::store::LayoutStore;
use crate::view::DragSubject;

/// A panel-docking layout engine
#[derive(Parser, Debug)]
#[command(name = "flexdock", version, about = "A panel-docking layout engine")]
pub struct CliArgs {
    /// Engine config file (defaults to ~/.config/flexdock/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the layout of a document and print every node's rect
    Layout {
        /// Layout document (JSON)
        model: PathBuf,
        #[arg(long, default_value_t = 1024.0)]
        width: f64,
        #[arg(long, default_value_t = 768.0)]
        height: f64,
        /// JSON array of actions to apply first
        #[arg(long, value_name = "FILE")]
        actions: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resolve where a dragged tab or tabset would drop
    Drop {
        model: PathBuf,
        /// Id of the dragged tab or tabset
        #[arg(long)]
        drag: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        /// Window the pointer is over (defaults to the main window)
        #[arg(long)]
        window: Option<String>,
        #[arg(long, default_value_t = 1024.0)]
        width: f64,
        #[arg(long, default_value_t = 768.0)]
        height: f64,
    },
    /// Validate a document and print it in canonical form
    Check { model: PathBuf },
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load_from(path).map_err(anyhow::Error::msg),
        None => Ok(EngineConfig::load()),
    }
}

fn load_store(path: &Path, config: EngineConfig) -> Result<LayoutStore> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout document {}", path.display()))?;
    LayoutStore::from_json(&json, config)
        .with_context(|| format!("Invalid layout document {}", path.display()))
}

fn rect_json(rect: Rect) -> serde_json::Value {
    serde_json::json!({"x": rect.x, "y": rect.y, "width": rect.width, "height": rect.height})
}

/// Run a parsed command, writing its report to `out`
pub fn run(args: CliArgs, out: &mut dyn Write) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Layout {
            model,
            width,
            height,
            actions,
            json,
        } => {
            let mut store = load_store(&model, config)?;
            if let Some(path) = actions {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read actions {}", path.display()))?;
                let actions: Vec<Action> = serde_json::from_str(&text)
                    .with_context(|| format!("Invalid actions in {}", path.display()))?;
                for (i, action) in actions.into_iter().enumerate() {
                    let kind = action.kind();
                    store
                        .do_action(action)
                        .with_context(|| format!("Action #{} ({}) was rejected", i, kind))?;
                }
            }

            let result = store.calculate_layout(Rect::new(0.0, 0.0, width, height));
            let mut rects: Vec<(&NodeId, &Rect)> = result.rects.iter().collect();
            rects.sort_by(|a, b| a.0.cmp(b.0));

            if json {
                let map: serde_json::Map<String, serde_json::Value> = rects
                    .iter()
                    .map(|(id, rect)| (id.as_str().to_string(), rect_json(**rect)))
                    .collect();
                let report = serde_json::json!({
                    "rects": map,
                    "splitters": result.splitters.len(),
                    "mainContent": rect_json(result.main_content),
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                for (id, r) in rects {
                    writeln!(
                        out,
                        "{:<24} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
                        id.as_str(),
                        r.x,
                        r.y,
                        r.width,
                        r.height
                    )?;
                }
            }
        }
        Command::Drop {
            model,
            drag,
            x,
            y,
            window,
            width,
            height,
        } => {
            let mut store = load_store(&model, config)?;
            store.calculate_layout(Rect::new(0.0, 0.0, width, height));
            let Some(subject) = DragSubject::of(&store, &NodeId::new(drag.clone())) else {
                bail!("{} is not a tab or tabset in this document", drag);
            };
            let window = window.map(WindowId::new).unwrap_or_else(WindowId::main);
            match store.compute_drop(&window, &subject, x, y) {
                Some(info) => writeln!(
                    out,
                    "{} {} index={} rect={:.1},{:.1},{:.1},{:.1} reorder={}",
                    info.node.as_str(),
                    info.location,
                    info.index.map_or(-1, |i| i as i64),
                    info.rect.x,
                    info.rect.y,
                    info.rect.width,
                    info.rect.height,
                    info.is_tab_reorder()
                )?,
                None => writeln!(out, "no drop target")?,
            }
        }
        Command::Check { model } => {
            let store = load_store(&model, config)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&store.to_json())?)?;
        }
    }
    Ok(())
}
