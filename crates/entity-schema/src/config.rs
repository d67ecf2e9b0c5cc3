// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema loader configuration.
//!
//! With the `config-loaders` feature (on by default) a [`LoaderConfig`] can
//! be read from YAML. Every key is optional.
//!
//! # Example YAML
//!
//! ```yaml
//! # schema_loader.yaml
//! missing_codec: reject      # or: degrade
//! duplicate_utype: warn      # or: reject
//! ```

use std::fmt;

/// What the loader does with a field whose type name resolves to no codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(rename_all = "lowercase"))]
pub enum MissingCodecPolicy {
    /// Log an error and keep an inert descriptor.
    #[default]
    Degrade,
    /// Abort the load.
    Reject,
}

/// What the loader does when two properties share a utype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(rename_all = "lowercase"))]
pub enum DuplicatePolicy {
    #[default]
    Warn,
    Reject,
}

/// Knobs for [`SchemaLoader`](crate::SchemaLoader).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config-loaders", derive(serde::Deserialize))]
#[cfg_attr(feature = "config-loaders", serde(default))]
pub struct LoaderConfig {
    pub missing_codec: MissingCodecPolicy,
    pub duplicate_utype: DuplicatePolicy,
}

impl LoaderConfig {
    /// Fail the load on any unresolved type or repeated utype.
    pub fn strict() -> Self {
        Self {
            missing_codec: MissingCodecPolicy::Reject,
            duplicate_utype: DuplicatePolicy::Reject,
        }
    }
}

#[cfg(feature = "config-loaders")]
impl LoaderConfig {
    /// Parse YAML content.
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self, ConfigError> {
        // A document with no keys means "all defaults".
        let blank = yaml_content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml_content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml_content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        log::debug!("[LoaderConfig::from_yaml_file] {}", path.display());
        Self::from_yaml_str(&yaml_content)
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: String, reason: String },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, reason } => {
                write!(f, "Failed to read config file {}: {}", path, reason)
            }
            ConfigError::Parse(reason) => write!(f, "Failed to parse YAML: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(all(test, feature = "config-loaders"))]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document() {
        assert_eq!(
            LoaderConfig::from_yaml_str("").unwrap(),
            LoaderConfig::default()
        );
        assert_eq!(
            LoaderConfig::from_yaml_str("# nothing here\n").unwrap(),
            LoaderConfig::default()
        );
    }

    #[test]
    fn test_partial_document() {
        let cfg = LoaderConfig::from_yaml_str("missing_codec: reject\n").unwrap();
        assert_eq!(cfg.missing_codec, MissingCodecPolicy::Reject);
        assert_eq!(cfg.duplicate_utype, DuplicatePolicy::Warn);
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
missing_codec: degrade
duplicate_utype: reject
"#;
        let cfg = LoaderConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.missing_codec, MissingCodecPolicy::Degrade);
        assert_eq!(cfg.duplicate_utype, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_invalid_policy() {
        let err = LoaderConfig::from_yaml_str("missing_codec: sometimes\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "missing_codec: reject").unwrap();
        writeln!(file, "duplicate_utype: reject").unwrap();

        let cfg = LoaderConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(cfg, LoaderConfig::strict());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LoaderConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
