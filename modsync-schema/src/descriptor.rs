//! On-disk module descriptor (`module.json`).

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::dependency::{DependencySpec, parse_dependencies};

pub const DEFAULT_MODULE_VERSION: &str = "1.0.0";

pub fn default_description(module: &str) -> String {
    format!("{module} module for the application")
}

/// Declarative metadata and desired enabled state of a module.
///
/// Keys this type does not model are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_bool_lax")]
    pub enabled: bool,

    /// `"package"` or `"package:constraint"` entries; non-string entries are dropped.
    #[serde(default, deserialize_with = "deserialize_string_list_lax")]
    pub dependencies: Vec<String>,

    /// Modules that must be enabled for this one to work. Historically named `dependents`,
    /// `required` is accepted as well.
    #[serde(
        default,
        alias = "required",
        deserialize_with = "deserialize_string_list_lax"
    )]
    pub dependents: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_enabled_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_disabled_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleDescriptor {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Pretty-printed JSON; `serde_json` never escapes `/`.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn dependency_specs(&self) -> Vec<DependencySpec> {
        parse_dependencies(&self.dependencies)
    }

    pub fn required_modules(&self) -> &[String] {
        &self.dependents
    }

    pub fn version_or_default(&self) -> String {
        self.version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_MODULE_VERSION)
            .to_string()
    }

    pub fn description_or_default(&self, module: &str) -> String {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map_or_else(|| default_description(module), str::to_string)
    }

    /// Flips `enabled` and stamps the matching timestamp, leaving the other one untouched.
    pub fn mark_enabled(&mut self, enabled: bool, at: DateTime<Utc>) {
        let at = at.trunc_subsecs(0);
        self.enabled = enabled;
        if enabled {
            self.last_enabled_at = Some(at);
        } else {
            self.last_disabled_at = Some(at);
        }
    }
}

fn deserialize_bool_lax<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::Number(n) => Ok(n.as_i64().is_some_and(|n| n != 0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean for `enabled`, got {other:?}"
            ))),
        },
        _ => Err(serde::de::Error::custom("expected a boolean for `enabled`")),
    }
}

fn deserialize_string_list_lax<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        _ => Err(serde::de::Error::custom("expected an array of strings")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_php_style_descriptor() {
        let raw = json!({
            "name": "Blog",
            "version": "2.1.0",
            "description": "Blog module",
            "enabled": true,
            "dependencies": ["league/commonmark:^2.4", "spatie/slug", 42],
            "dependents": ["Core", "Media"],
            "last_enabled_at": "2024-05-01T10:00:00+00:00",
            "providers": ["Modules\\Blog\\Providers\\BlogServiceProvider"]
        })
        .to_string();

        let d = ModuleDescriptor::from_json_str(&raw).unwrap();
        assert!(d.enabled);
        assert_eq!(d.dependencies, vec!["league/commonmark:^2.4", "spatie/slug"]);
        assert_eq!(d.required_modules(), ["Core", "Media"]);
        assert_eq!(
            d.last_enabled_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert!(d.extra.contains_key("providers"));
    }

    #[test]
    fn required_key_is_an_alias_for_dependents() {
        let d = ModuleDescriptor::from_json_str(r#"{"required": ["Core"]}"#).unwrap();
        assert_eq!(d.dependents, vec!["Core"]);
        assert!(!d.enabled);
    }

    #[test]
    fn defaults_fill_missing_metadata() {
        let d = ModuleDescriptor::from_json_str(r#"{"enabled": "1"}"#).unwrap();
        assert!(d.enabled);
        assert_eq!(d.version_or_default(), "1.0.0");
        assert_eq!(d.description_or_default("Shop"), "Shop module for the application");
    }

    #[test]
    fn mark_enabled_only_touches_matching_timestamp() {
        let mut d = ModuleDescriptor::default();
        let enabled_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        d.mark_enabled(true, enabled_at);
        let disabled_at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        d.mark_enabled(false, disabled_at);

        assert!(!d.enabled);
        assert_eq!(d.last_enabled_at, Some(enabled_at));
        assert_eq!(d.last_disabled_at, Some(disabled_at));
    }

    #[test]
    fn pretty_output_keeps_slashes_and_unknown_keys() {
        let raw = r#"{"name":"Blog","enabled":false,"dependencies":["acme/pkg"],"paths":{"src":"src/Http"}}"#;
        let d = ModuleDescriptor::from_json_str(raw).unwrap();
        let out = d.to_json_pretty().unwrap();
        assert!(out.contains("\"acme/pkg\""));
        assert!(out.contains("\"src/Http\""));
        assert!(out.contains('\n'));

        let back = ModuleDescriptor::from_json_str(&out).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn rejects_non_list_dependencies() {
        assert!(ModuleDescriptor::from_json_str(r#"{"dependencies": "acme/pkg"}"#).is_err());
    }
}
