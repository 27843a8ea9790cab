use crate::error::ConfigError;
use crate::width::Width;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_layout::FlagRepr;

/// What to do when an `llvm.assume` condition is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssumePolicy {
    /// Evaluate nothing and say nothing.
    #[default]
    Ignore,
    /// Log the violated assumption at `warn` level.
    Warn,
}

/// Evaluator settings, usually loaded from a `strata.toml`-style file.
///
/// ```toml
/// flag_repr = "i32"
/// assume_policy = "warn"
///
/// [flag_offsets]
/// 16 = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    /// Storage of the overflow flag in written-back aggregates
    #[serde(default)]
    pub flag_repr: FlagRepr,

    /// Flag offsets in bytes keyed by value width ("8", "16", "32", "64")
    #[serde(default)]
    pub flag_offsets: FxHashMap<String, u64>,

    /// Handling of false `llvm.assume` conditions
    #[serde(default)]
    pub assume_policy: AssumePolicy,
}

impl EvalConfig {
    /// Parses and validates a configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EvalConfig = toml::from_str(source)?;
        config.flag_offset_overrides()?;
        Ok(config)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Read(format!("{}: {}", path.display(), err)))?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("loaded evaluator configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// The `flag_offsets` table with its keys resolved to widths, in ascending width order.
    pub fn flag_offset_overrides(&self) -> Result<Vec<(Width, u64)>, ConfigError> {
        let mut overrides = self
            .flag_offsets
            .iter()
            .map(|(key, &offset)| {
                key.parse::<u32>()
                    .ok()
                    .and_then(Width::from_bits)
                    .map(|width| (width, offset))
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!(
                            "flag_offsets key `{}` is not one of 8, 16, 32 or 64",
                            key
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        overrides.sort_unstable();
        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = EvalConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, EvalConfig::default());
        assert_eq!(config.flag_repr, FlagRepr::I32);
        assert_eq!(config.assume_policy, AssumePolicy::Ignore);
    }

    #[test]
    fn parses_all_fields() {
        let config = EvalConfig::from_toml_str(
            r#"
            flag_repr = "i8"
            assume_policy = "warn"

            [flag_offsets]
            64 = 12
            16 = 8
            "#,
        )
        .expect("valid config");
        assert_eq!(config.flag_repr, FlagRepr::I8);
        assert_eq!(config.assume_policy, AssumePolicy::Warn);
        assert_eq!(
            config.flag_offset_overrides().expect("valid keys"),
            vec![(Width::W16, 8), (Width::W64, 12)]
        );
    }

    #[test]
    fn rejects_unknown_width_key() {
        let err = EvalConfig::from_toml_str("[flag_offsets]\n128 = 16\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_field_and_bad_enum() {
        assert!(matches!(
            EvalConfig::from_toml_str("flag_size = 4\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EvalConfig::from_toml_str("flag_repr = \"i16\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
