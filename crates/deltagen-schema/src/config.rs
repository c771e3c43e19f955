use serde::{Deserialize, Serialize};

/// Configuration for schema validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject schemas that do not mark any record as root.
    pub require_root: bool,
    /// Accept reference cycles that pass through at least one map member.
    ///
    /// Cycles made only of nested-record members are always rejected, since
    /// every value of such a record would be infinitely large.
    pub allow_map_cycles: bool,
}

impl ValidationConfig {
    /// Require a root record and reject every reference cycle.
    pub fn strict() -> Self {
        Self {
            require_root: true,
            ..Default::default()
        }
    }

    /// Allow recursive record types reached through maps (trees keyed by id).
    pub fn permissive() -> Self {
        Self {
            allow_map_cycles: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ValidationConfig::default();
        assert!(!c.require_root);
        assert!(!c.allow_map_cycles);
    }

    #[test]
    fn strict_and_permissive() {
        assert!(ValidationConfig::strict().require_root);
        assert!(!ValidationConfig::strict().allow_map_cycles);
        assert!(ValidationConfig::permissive().allow_map_cycles);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let c: ValidationConfig = toml::from_str("allow_map_cycles = true").unwrap();
        assert!(c.allow_map_cycles);
        assert!(!c.require_root);
    }
}
