//! Configuration for the template assembler.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location and shape of the notice template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Root of the unpacked template tree.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// File name of the document text entry.
    #[serde(default = "default_content_entry")]
    pub content_entry: String,

    /// File name of the barcode placeholder image.
    #[serde(default = "default_barcode_entry")]
    pub barcode_entry: String,
}

fn default_dir() -> PathBuf {
    PathBuf::from("template")
}

fn default_content_entry() -> String {
    "content.xml".to_string()
}

fn default_barcode_entry() -> String {
    "10000000000001F400000064723B2F633C7B66BB.png".to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            content_entry: default_content_entry(),
            barcode_entry: default_barcode_entry(),
        }
    }
}

impl TemplateConfig {
    /// Sets the template root.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TemplateConfig::default();
        assert_eq!(config.dir, PathBuf::from("template"));
        assert_eq!(config.content_entry, "content.xml");
        assert!(config.barcode_entry.ends_with(".png"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: TemplateConfig = toml::from_str(r#"dir = "/opt/form22""#).unwrap();
        assert_eq!(config.dir, PathBuf::from("/opt/form22"));
        assert_eq!(config.content_entry, "content.xml");
    }
}
