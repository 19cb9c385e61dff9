use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an exported artifact.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub config: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            config: Value::Null,
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }
}

/// Write `<artifact stem>.provenance.json` next to an existing `artifact`: git commit,
/// library version, callsite, command parameters, closure config, and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    // The artifact is already written, so its directory exists.
    let provenance_path = provenance_path(artifact);
    let callsite = Location::caller();
    let doc = json!({
        "code_rev": code_rev(),
        "foldref_version": foldref::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "command": payload.command,
        "params": payload.params,
        "config": payload.config,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

/// `steps.json` -> `steps.provenance.json`; an extensionless artifact just
/// gains the suffix.
fn provenance_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// Commit the exported artifact was produced from: `GIT_COMMIT` at run time,
/// then at build time, then `git rev-parse HEAD`.
fn code_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .or_else(|| option_env!("GIT_COMMIT").map(str::to_owned))
        .filter(|rev| !rev.is_empty())
        .or_else(head_from_git)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn head_from_git() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    Some(rev.trim().to_owned()).filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn provenance_path_replaces_extension() {
        let base = Path::new("/tmp/folds/centre.json");
        assert_eq!(
            provenance_path(base),
            Path::new("/tmp/folds/centre.provenance.json")
        );
        assert_eq!(
            provenance_path(Path::new("out/steps")),
            Path::new("out/steps.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_command_config_and_output() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("steps.json");
        fs::write(&artifact, "[]").unwrap();
        let payload = Payload::new("fold", json!({"x": 0.5, "y": 0.5}))
            .with_config(json!({"max_rank": 2}));
        let prov_path = write_sidecar(&artifact, payload).unwrap();
        assert_eq!(prov_path, dir.path().join("steps.provenance.json"));
        let parsed: Value = serde_json::from_slice(&fs::read(prov_path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "fold");
        assert_eq!(parsed["params"]["x"], 0.5);
        assert_eq!(parsed["config"]["max_rank"], 2);
        assert_eq!(parsed["foldref_version"], foldref::VERSION);
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
    }
}
