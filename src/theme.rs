use serde::Deserialize;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{TmulError, TmulResult};
use crate::node::Attributes;
use crate::resolver::resolve;
use crate::style::Style;

/// Kinds that always have an entry in a style sheet.
pub const BUILTIN_KINDS: [&str; 4] = ["text", "title", "list", "table"];

/// Per-kind default styles. Attribute overrides on a node are resolved on
/// top of the entry for its kind; unknown kinds start from a neutral style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    styles: HashMap<String, Style>,
}

/// On-disk form of a style sheet.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleSheetConfig {
    #[serde(default)]
    styles: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        let styles = BUILTIN_KINDS
            .iter()
            .map(|kind| (kind.to_string(), Style::default()))
            .collect();
        Self { styles }
    }
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default style for `kind`, neutral when the sheet has no entry.
    pub fn base_style(&self, kind: &str) -> Style {
        self.styles.get(kind).cloned().unwrap_or_default()
    }

    pub fn with_style(mut self, kind: impl Into<String>, style: Style) -> Self {
        self.styles.insert(kind.into(), style);
        self
    }

    /// Kinds with an entry, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Parse a YAML style sheet:
    ///
    /// ```yaml
    /// styles:
    ///   text: { color: "#ffffff" }
    ///   box: { border: rounded, padding: true }
    /// ```
    ///
    /// Each kind's map uses the document attribute vocabulary and is
    /// resolved from a neutral style. Built-in kinds missing from the file
    /// keep their defaults.
    pub fn from_yaml(source: &str) -> TmulResult<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: StyleSheetConfig = serde_yaml::from_str(source)?;

        let mut sheet = Self::default();
        for (kind, entries) in config.styles {
            let mut attributes = Attributes::new();
            for (key, value) in entries {
                let value = scalar_to_string(&value).ok_or_else(|| {
                    TmulError::Config(format!(
                        "styles.{}.{}: expected a string, number or boolean",
                        kind, key
                    ))
                })?;
                attributes.insert(key, value);
            }
            let style = resolve(&Style::default(), &attributes);
            sheet.styles.insert(kind, style);
        }
        Ok(sheet)
    }

    /// Read a YAML style sheet from disk.
    pub fn load(path: impl AsRef<Path>) -> TmulResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
