//! Loading and rendering of the static Slurm job templates.
//!
//! Templates are plain text with `{name}` placeholders; `{{` and `}}` are
//! literal braces. Rendering is a pure substitution over a key/value map,
//! so the same inputs always produce byte-identical script text.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the template directory.
pub const TEMPLATE_DIR_ENV: &str = "RAD_PIPELINE_TEMPLATES";

/// Errors produced while loading or rendering a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The named template file could not be read.
    #[error("failed to load template '{name}' from {path}: {source}")]
    Load {
        /// Template file name.
        name: String,
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The installation prefix could not be derived from the executable path.
    #[error("cannot locate template directory: {0}")]
    NoTemplateDir(String),

    /// A placeholder in the template had no value in the substitution map.
    #[error("template references unknown placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),

    /// A `{` was opened but never closed, or a stray `}` appeared.
    #[error("unbalanced brace at byte offset {0}")]
    UnbalancedBrace(usize),
}

/// Substitution map from placeholder name to rendered value.
pub type Substitutions = HashMap<&'static str, String>;

/// Resolve the directory holding the `.slurm` templates.
///
/// `$RAD_PIPELINE_TEMPLATES` wins when set; otherwise the directory is
/// `../share/rad-pipeline/templates` relative to the running executable.
pub fn template_dir() -> Result<PathBuf, TemplateError> {
    template_dir_from(std::env::var_os(TEMPLATE_DIR_ENV))
}

/// Resolve the template directory given an optional override value.
fn template_dir_from(override_dir: Option<OsString>) -> Result<PathBuf, TemplateError> {
    if let Some(dir) = override_dir {
        return Ok(PathBuf::from(dir));
    }

    let exe = std::env::current_exe()
        .map_err(|e| TemplateError::NoTemplateDir(e.to_string()))?;
    let bindir = exe
        .parent()
        .ok_or_else(|| TemplateError::NoTemplateDir("executable has no parent".into()))?;
    Ok(bindir.join("../share/rad-pipeline/templates"))
}

/// Load a template by file name from the template directory.
pub fn load_template(name: &str) -> Result<String, TemplateError> {
    load_template_in(&template_dir()?, name)
}

/// Load a template by file name from an explicit directory.
fn load_template_in(dir: &Path, name: &str) -> Result<String, TemplateError> {
    let path = dir.join(name);
    debug!(template = name, path = %path.display(), "loading template");
    std::fs::read_to_string(&path).map_err(|source| TemplateError::Load {
        name: name.to_string(),
        path: path.display().to_string(),
        source,
    })
}

/// Substitute `{name}` placeholders in `template` from `subs`.
pub fn render(template: &str, subs: &Substitutions) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if bytes.get(i + 1) == Some(&b'{') {
                    out.push('{');
                    i += 2;
                    continue;
                }
                let close = template[i + 1..]
                    .find('}')
                    .ok_or(TemplateError::UnbalancedBrace(i))?;
                let key = &template[i + 1..i + 1 + close];
                let value = subs
                    .get(key)
                    .ok_or_else(|| TemplateError::UnknownPlaceholder(key.to_string()))?;
                out.push_str(value);
                i += close + 2;
            }
            b'}' => {
                if bytes.get(i + 1) == Some(&b'}') {
                    out.push('}');
                    i += 2;
                } else {
                    return Err(TemplateError::UnbalancedBrace(i));
                }
            }
            _ => {
                // Copy the whole UTF-8 character, not just the lead byte.
                let ch = template[i..].chars().next().expect("in-bounds char");
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    Ok(out)
}

/// Load and render a template in one step.
pub fn render_template(name: &str, subs: &Substitutions) -> Result<String, TemplateError> {
    let template = load_template(name)?;
    render(&template, subs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs(pairs: &[(&'static str, &str)]) -> Substitutions {
        pairs
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_placeholders() {
        let out = render("run {tool} on {files}", &subs(&[("tool", "kraken"), ("files", "a b")]))
            .unwrap();
        assert_eq!(out, "run kraken on a b");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let out = render("awk '{{print $1}}' {input}", &subs(&[("input", "x.txt")])).unwrap();
        assert_eq!(out, "awk '{print $1}' x.txt");
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = render("{missing}", &subs(&[])).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder(k) if k == "missing"));
    }

    #[test]
    fn stray_brace_is_an_error() {
        assert!(matches!(
            render("oops }", &subs(&[])),
            Err(TemplateError::UnbalancedBrace(5))
        ));
        assert!(matches!(
            render("{never closed", &subs(&[])),
            Err(TemplateError::UnbalancedBrace(0))
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let s = subs(&[("a", "1"), ("b", "2")]);
        let first = render("{a}-{b}-{a}", &s).unwrap();
        let second = render("{a}-{b}-{a}", &s).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "1-2-1");
    }

    #[test]
    fn override_value_wins_over_installation_prefix() {
        let dir = template_dir_from(Some(OsString::from("/opt/site/templates"))).unwrap();
        assert_eq!(dir, PathBuf::from("/opt/site/templates"));
    }

    #[test]
    fn templates_load_and_render_from_an_explicit_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mini.slurm"), "#!/bin/bash\necho {msg}\n").unwrap();

        let template = load_template_in(dir.path(), "mini.slurm").unwrap();
        let out = render(&template, &subs(&[("msg", "hi")])).unwrap();
        assert_eq!(out, "#!/bin/bash\necho hi\n");
    }

    #[test]
    fn missing_template_is_a_descriptive_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_template_in(dir.path(), "absent.slurm").unwrap_err();
        assert!(matches!(err, TemplateError::Load { ref name, .. } if name == "absent.slurm"));
    }
}
