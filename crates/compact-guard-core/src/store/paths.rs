//! Tier locations for a project

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::project_key::ProjectKey;

/// Extension of global-tier files
pub const GLOBAL_EXT: &str = "md";

/// Storage tier holding a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Inside the project's own state directory; authoritative when present
    Local,
    /// Under the global state directory, keyed by project key
    Global,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Local => "local",
            Tier::Global => "global",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both tier paths for one working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub key: ProjectKey,
    pub global_file: PathBuf,
    pub local_dir: PathBuf,
    pub local_file: PathBuf,
}

impl ProjectPaths {
    pub fn new(state_dir: &Path, cwd: &str, local_dir: &str, local_file: &str) -> Self {
        let key = ProjectKey::from_cwd(cwd);
        let global_file = state_dir.join(format!("{}.{}", key, GLOBAL_EXT));
        let local_dir = Path::new(cwd).join(local_dir);
        let local_file = local_dir.join(local_file);
        Self {
            key,
            global_file,
            local_dir,
            local_file,
        }
    }

    /// Lookup order for reads: local first, then global
    pub fn read_order(&self) -> [(Tier, &Path); 2] {
        [
            (Tier::Local, self.local_file.as_path()),
            (Tier::Global, self.global_file.as_path()),
        ]
    }
}
