//! # Persisted Artifacts
//!
//! Two plain-text diagnostics per monitor, both valid program files:
//!
//! - `<name>Geometry.cl`: the compiled geometry facts, rewritten whenever
//!   they are recompiled.
//! - `<name>Log.cl`: truncated when the monitor starts, then appended with
//!   every solved program, each preceded by
//!   `% program <n> <utc time> <fingerprint>`.
//!
//! Writing is best effort. I/O failures are logged and never reach the
//! arbitration cycle.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use junction_geometry::GeometryFacts;
use junction_reasoner::Program;

/// Writer for one monitor's artifact files.
#[derive(Debug)]
pub struct ArtifactWriter {
    geometry_path: PathBuf,
    log_path: PathBuf,
    entries: u64,
}

impl ArtifactWriter {
    /// Prepare `dir` and truncate the program log.
    pub fn open(dir: &Path, name: &str) -> Self {
        let writer = Self {
            geometry_path: dir.join(format!("{name}Geometry.cl")),
            log_path: dir.join(format!("{name}Log.cl")),
            entries: 0,
        };
        if let Err(err) = fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), error = %err, "cannot create artifact directory");
            return writer;
        }
        if let Err(err) = File::create(&writer.log_path) {
            tracing::warn!(path = %writer.log_path.display(), error = %err, "cannot truncate program log");
        }
        writer
    }

    /// Path of the geometry dump.
    pub fn geometry_path(&self) -> &Path {
        &self.geometry_path
    }

    /// Path of the program log.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Programs appended so far.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Overwrite the geometry dump.
    pub fn write_geometry(&self, facts: &GeometryFacts) {
        let body = format!("% geometry {}\n{}", facts.fingerprint(), facts.text());
        match fs::write(&self.geometry_path, body) {
            Ok(()) => tracing::debug!(path = %self.geometry_path.display(), facts = facts.len(), "geometry written"),
            Err(err) => tracing::warn!(
                path = %self.geometry_path.display(),
                error = %err,
                "cannot write geometry facts"
            ),
        }
    }

    /// Append one solved program to the log.
    pub fn append_program(&mut self, program: &Program) {
        self.entries += 1;
        let header = format!(
            "% program {} {} {}\n",
            self.entries,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            program.fingerprint()
        );
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| {
                file.write_all(header.as_bytes())?;
                file.write_all(program.text().as_bytes())?;
                if !program.text().ends_with('\n') {
                    file.write_all(b"\n")?;
                }
                Ok(())
            });
        if let Err(err) = result {
            tracing::warn!(path = %self.log_path.display(), error = %err, "cannot append program log");
        }
    }
}
