//! Bundled snapshot location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    PathBuf::from("datasets")
}

fn default_makes_file() -> String {
    "makes.xml".to_string()
}

fn default_types_file() -> String {
    "types.xml".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Directory holding the snapshot files.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_makes_file")]
    pub makes_file: String,

    #[serde(default = "default_types_file")]
    pub types_file: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            makes_file: default_makes_file(),
            types_file: default_types_file(),
        }
    }
}
