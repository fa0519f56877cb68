//! Run configuration for `xlsx-lint`, loaded from YAML.
//!
//! ```yaml
//! tag: client
//! sources:
//!   - tables/
//!   - extra/item.csv
//! dump: summary
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xlsxporter_parse::ParseOptions;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    /// One line per sheet.
    #[default]
    Summary,
    /// Schema tree of every parsed sheet.
    Tree,
    /// Parsed tables as JSON.
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Export tag; empty exports every field.
    #[serde(default)]
    pub tag: String,
    /// Files or directories to scan.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    #[serde(default)]
    pub dump: Option<DumpFormat>,
}

impl ExportConfig {
    pub fn from_yaml_reader<R: std::io::Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_reader(BufReader::new(file)).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::with_tag(self.tag.as_str())
    }
}
