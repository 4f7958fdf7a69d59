//! # junction-cli: Operator CLI for Junction
//!
//! Provides the `junction` command-line interface for exercising a monitor
//! outside a host simulation.
//!
//! ## Subcommands
//!
//! - `junction replay`: feed a recorded event file through a monitor and
//!   print every solve and the commands it issued.
//! - `junction geometry`: print the geometry facts compiled from an
//!   intersection description.
//! - `junction check-rules`: parse a rule program and report whether the
//!   in-process oracle can evaluate it.
//!
//! ```bash
//! junction replay --intersection crossing.yaml --events rush-hour.yaml -v
//! junction geometry --intersection crossing.yaml
//! junction check-rules rules/uncontrolled-intersection.cl
//! ```

pub mod check;
pub mod geometry;
pub mod replay;

use std::path::Path;

use anyhow::{Context, Result};

use junction_core::MonitorConfig;

/// Load the monitor configuration, or fall back to defaults when no file is
/// given.
pub fn resolve_config(path: Option<&Path>) -> Result<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(MonitorConfig::default()),
    }
}
