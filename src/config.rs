//! User configuration for completion behaviour
//!
//! Settings live under the `fusionautocomplete` section. Clients may send
//! them as `initializationOptions` or through
//! `workspace/didChangeConfiguration`, either as the bare section object or
//! wrapped in `{ "fusionautocomplete": { ... } }`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{FusionError, FusionResult};

/// Name of the settings section understood by the server.
pub const CONFIG_SECTION: &str = "fusionautocomplete";

/// Default location of the Roblox API dump.
pub const DEFAULT_API_DUMP_URL: &str =
    "https://raw.githubusercontent.com/MaximumADHD/Roblox-Client-Tracker/roblox/API-Dump.json";

/// How inserted Fusion import names are cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CasingMode {
    #[default]
    #[serde(rename = "camelCase")]
    Camel,
    #[serde(rename = "snake_case")]
    Snake,
    #[serde(rename = "PascalCase")]
    Pascal,
}

/// How the Fusion import block is ordered when a new import is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    #[default]
    Alphabetical,
    Category,
    /// Keep existing imports in place and append the new one.
    None,
}

/// Characters that trigger each completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TriggerCharacters {
    pub class_name: Vec<String>,
    pub properties: Vec<String>,
    pub functions: Vec<String>,
    pub function_parameters: Vec<String>,
}

impl Default for TriggerCharacters {
    fn default() -> Self {
        let quotes = || vec!["\"".to_string(), "'".to_string(), "`".to_string()];
        Self {
            class_name: quotes(),
            properties: vec!["{".to_string(), ",".to_string(), ";".to_string()],
            functions: Vec::new(),
            function_parameters: quotes(),
        }
    }
}

impl TriggerCharacters {
    /// Union of every provider's trigger characters, deduplicated, in first-seen order.
    pub fn all(&self) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        for c in self
            .class_name
            .iter()
            .chain(&self.properties)
            .chain(&self.functions)
            .chain(&self.function_parameters)
        {
            if !all.contains(c) {
                all.push(c.clone());
            }
        }
        all
    }
}

/// Snapshot of the `fusionautocomplete` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FusionConfig {
    /// Callees treated as instance constructors, e.g. `New "Frame" { ... }`.
    pub new_aliases: Vec<String>,
    /// Local names the Fusion module may be bound to.
    pub fusion_aliases: Vec<String>,
    pub fusion_version: String,
    pub casing_mode: CasingMode,
    pub grouping_mode: GroupingMode,
    pub trigger_characters: TriggerCharacters,
    pub api_dump_url: String,
    pub api_dump_path: Option<String>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            new_aliases: vec!["New".to_string(), "Hydrate".to_string()],
            fusion_aliases: vec!["Fusion".to_string()],
            fusion_version: "0.2".to_string(),
            casing_mode: CasingMode::default(),
            grouping_mode: GroupingMode::default(),
            trigger_characters: TriggerCharacters::default(),
            api_dump_url: DEFAULT_API_DUMP_URL.to_string(),
            api_dump_path: None,
        }
    }
}

impl FusionConfig {
    /// Parses settings sent by the client.
    ///
    /// `null` yields the defaults. Missing keys keep their defaults.
    pub fn from_value(value: Value) -> FusionResult<Self> {
        let section = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(mut map) => match map.remove(CONFIG_SECTION) {
                Some(inner) => inner,
                None => Value::Object(map),
            },
            other => {
                return Err(FusionError::Config(format!(
                    "expected an object for `{}`, got {}",
                    CONFIG_SECTION, other
                )));
            }
        };

        if section.is_null() {
            return Ok(Self::default());
        }

        serde_json::from_value(section).map_err(|e| FusionError::Config(e.to_string()))
    }

    pub fn is_new_alias(&self, name: &str) -> bool {
        contains_ignore_case(&self.new_aliases, name)
    }

    pub fn is_fusion_alias(&self, name: &str) -> bool {
        contains_ignore_case(&self.fusion_aliases, name)
    }
}

fn contains_ignore_case(list: &[String], name: &str) -> bool {
    list.iter().any(|alias| alias.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_gives_defaults() {
        let config = FusionConfig::from_value(Value::Null).unwrap();
        assert_eq!(config, FusionConfig::default());
        assert_eq!(config.fusion_version, "0.2");
        assert_eq!(config.casing_mode, CasingMode::Camel);
    }

    #[test]
    fn test_wrapped_section_is_unwrapped() {
        let config = FusionConfig::from_value(json!({
            "fusionautocomplete": {
                "newAliases": ["Make"],
                "casingMode": "snake_case",
                "groupingMode": "category"
            }
        }))
        .unwrap();

        assert_eq!(config.new_aliases, vec!["Make".to_string()]);
        assert_eq!(config.casing_mode, CasingMode::Snake);
        assert_eq!(config.grouping_mode, GroupingMode::Category);
        // Untouched keys keep their defaults
        assert_eq!(config.fusion_aliases, vec!["Fusion".to_string()]);
    }

    #[test]
    fn test_bare_section_is_accepted() {
        let config = FusionConfig::from_value(json!({ "casingMode": "PascalCase" })).unwrap();
        assert_eq!(config.casing_mode, CasingMode::Pascal);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(FusionConfig::from_value(json!({ "casingMode": "kebab" })).is_err());
        assert!(FusionConfig::from_value(json!(42)).is_err());
    }

    #[test]
    fn test_aliases_match_case_insensitively() {
        let config = FusionConfig::default();
        assert!(config.is_new_alias("new"));
        assert!(config.is_new_alias("HYDRATE"));
        assert!(!config.is_new_alias("Create"));
        assert!(config.is_fusion_alias("fusion"));
    }

    #[test]
    fn test_trigger_union_is_deduplicated() {
        let all = TriggerCharacters::default().all();
        assert_eq!(all, vec!["\"", "'", "`", "{", ",", ";"]);
    }
}
