//! Lookup of environment-module versions for script banner lines.
//!
//! Generated scripts record which module versions were current when the
//! script was rendered. The lookup shells out to the site helper
//! `rad-pipeline_module_version`; a missing helper or non-zero exit is
//! fatal to the invocation, matching the rest of the pipeline tooling.

use std::process::Command;

use thiserror::Error;

/// Name of the site helper executable.
const LOOKUP_COMMAND: &str = "rad-pipeline_module_version";

/// Errors produced while querying module versions.
#[derive(Error, Debug)]
pub enum ModVerError {
    /// The helper could not be spawned.
    #[error("failed to run {LOOKUP_COMMAND} for module '{module}': {source}")]
    Spawn {
        /// Module that was being queried.
        module: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The helper exited with a failure status.
    #[error("{LOOKUP_COMMAND} failed for module '{module}' (status {status})")]
    Failed {
        /// Module that was being queried.
        module: String,
        /// Exit status description.
        status: String,
    },

    /// The helper produced non-UTF-8 output.
    #[error("{LOOKUP_COMMAND} produced non-UTF-8 output for module '{module}'")]
    BadOutput {
        /// Module that was being queried.
        module: String,
    },
}

/// Query the version string for a module, trimmed of trailing whitespace.
pub fn module_version(module: &str) -> Result<String, ModVerError> {
    let output = Command::new(LOOKUP_COMMAND)
        .arg(module)
        .output()
        .map_err(|source| ModVerError::Spawn {
            module: module.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ModVerError::Failed {
            module: module.to_string(),
            status: output.status.to_string(),
        });
    }

    let text = String::from_utf8(output.stdout).map_err(|_| ModVerError::BadOutput {
        module: module.to_string(),
    })?;
    Ok(text.trim_end().to_string())
}
