use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("taskcloser")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TaskcloserConfig {
    pub data_directory: PathBuf,
}

impl Default for TaskcloserConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
        }
    }
}

impl TaskcloserConfig {
    /// Ensure the data directory exists.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }
}
