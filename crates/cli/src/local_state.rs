use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_STATE_PATH: &str = "config/cli_state.json";

/// Small JSON file keeping the remembered username between runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub remembered_username: Option<String>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }
}

pub fn default_state_path() -> &'static str {
    DEFAULT_STATE_PATH
}
