//! # Geometry Subcommand
//!
//! Compiles an intersection description and prints the resulting fact set,
//! exactly as it would be prepended to every solved program.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use junction_geometry::{GeometryFacts, IntersectionDescription};

/// Arguments for the `junction geometry` subcommand.
#[derive(Args, Debug)]
pub struct GeometryArgs {
    /// Intersection description (YAML).
    #[arg(long, value_name = "FILE")]
    pub intersection: PathBuf,
}

/// Compile the facts for the description at `path`.
pub fn compile_description(path: &Path) -> Result<GeometryFacts> {
    let layout = IntersectionDescription::load(path)
        .with_context(|| format!("failed to load intersection {}", path.display()))?;
    let intersection = layout.build().context("invalid intersection description")?;
    let probe = layout.overlap_probe();
    Ok(GeometryFacts::compile(&intersection, probe.as_ref()))
}

/// Execute the geometry subcommand.
///
/// Returns exit code: 0 on success.
pub fn run_geometry(args: &GeometryArgs) -> Result<u8> {
    let facts = compile_description(&args.intersection)?;
    tracing::info!(facts = facts.len(), "compiled geometry");
    println!("% geometry {}", facts.fingerprint());
    print!("{}", facts.text());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_compiles_to_facts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.yaml");
        std::fs::write(
            &path,
            r#"
forks:
  - { id: a, location: { x: -1000, y: 0 }, forward: { x: 1, y: 0 } }
  - { id: b, location: { x: 0, y: -1000 }, forward: { x: 0, y: 1 } }
exits:
  - { id: x, location: { x: 1000, y: 0 }, forward: { x: 1, y: 0 } }
lanes:
  - { fork: a, exit: x }
"#,
        )
        .unwrap();
        let facts = compile_description(&path).unwrap();
        assert!(facts.text().contains("isOnRightOf(f_a, f_b)."));
        assert!(facts.text().contains("laneCorrectSignal(l_a_to_x, off)."));
    }

    #[test]
    fn unknown_lane_endpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.yaml");
        std::fs::write(&path, "lanes:\n  - { fork: a, exit: x }\n").unwrap();
        assert!(compile_description(&path).is_err());
    }
}
