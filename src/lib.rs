//! flexdock - a panel-docking layout engine
//!
//! Tabsets, splitters, edge borders and floating windows, driven Elm-style:
//! every change is an [`Action`] run through [`update`] against a [`Model`],
//! and [`layout`] turns the model into rectangles for a renderer to draw.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod messages;
pub mod model;
pub mod store;
pub mod tracing;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{ActionError, ModelError};
pub use messages::Action;
pub use model::Model;
pub use store::LayoutStore;
pub use update::update;
