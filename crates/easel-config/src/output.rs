use std::path::PathBuf;

use serde::Deserialize;

/// Location of generated artifacts
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory name created under the workspace root
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Workspace root used when a call does not name one; defaults to the process cwd
    #[serde(default)]
    pub workspace_dir: Option<PathBuf>,
}

impl OutputConfig {
    /// Resolve the output directory for a call
    ///
    /// A per-call workspace wins over the configured one, which wins over the cwd.
    pub fn resolve(&self, workspace_override: Option<&str>) -> std::io::Result<PathBuf> {
        let root = match (workspace_override, &self.workspace_dir) {
            (Some(dir), _) => PathBuf::from(dir),
            (None, Some(dir)) => dir.clone(),
            (None, None) => std::env::current_dir()?,
        };
        Ok(root.join(&self.directory))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            workspace_dir: None,
        }
    }
}

fn default_directory() -> String {
    "output".to_string()
}
