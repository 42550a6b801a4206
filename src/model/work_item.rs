use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub name: String,
    /// Id of the parent task. Absent, null and empty all mean "this is an epic".
    #[serde(default)]
    pub parent: Option<String>,
    /// Sibling ordering key. ClickUp sends it as a numeric string under `orderindex`.
    #[serde(
        default,
        alias = "orderindex",
        deserialize_with = "deserialize_order_index"
    )]
    pub order_index: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub custom_fields: Vec<CustomField>,
}

impl WorkItem {
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().filter(|p| !p.is_empty())
    }

    pub fn custom_field(&self, name: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub type_config: TypeConfig,
    #[serde(default)]
    pub value: Option<Value>,
}

impl CustomField {
    /// Select-style fields only accept one of their predefined options.
    pub fn is_constrained(&self) -> bool {
        !self.type_config.options.is_empty()
    }

    /// Current value rendered for the console, `None` when unset or blank.
    pub fn display_value(&self) -> Option<String> {
        match self.value.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub options: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    Number,
    Text,
    ShortText,
    DropDown,
    Labels,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Number => "number",
            FieldType::Text => "text",
            FieldType::ShortText => "short_text",
            FieldType::DropDown => "drop_down",
            FieldType::Labels => "labels",
            FieldType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "number" => FieldType::Number,
            "text" => FieldType::Text,
            "short_text" => FieldType::ShortText,
            "drop_down" => FieldType::DropDown,
            "labels" => FieldType::Labels,
            _ => FieldType::Other(s),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn deserialize_order_index<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
