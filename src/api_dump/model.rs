//! Serde model of the Roblox API dump
//!
//! Only the parts needed for completion are modelled. Unknown fields are
//! ignored so newer dumps keep loading.

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Root of `API-Dump.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiDump {
    #[serde(default)]
    pub classes: Vec<ApiClass>,
}

/// A single engine class.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiClass {
    pub name: String,
    /// `<<<ROOT>>>` for `Instance`; any name without a class entry ends the chain.
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberType {
    Property,
    DataType,
    Event,
    Function,
    Callback,
    Other(String),
}

impl From<String> for MemberType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Property" => Self::Property,
            "DataType" => Self::DataType,
            "Event" => Self::Event,
            "Function" => Self::Function,
            "Callback" => Self::Callback,
            _ => Self::Other(value),
        }
    }
}

impl<'de> Deserialize<'de> for MemberType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Property => "Property",
            Self::DataType => "DataType",
            Self::Event => "Event",
            Self::Function => "Function",
            Self::Callback => "Callback",
            Self::Other(name) => name,
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValueType {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "Type")]
    pub ty: ValueType,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClassMember {
    pub name: String,
    pub member_type: MemberType,
    #[serde(default)]
    pub value_type: Option<ValueType>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl ClassMember {
    pub fn is_read_only(&self) -> bool {
        self.tags.iter().any(|tag| tag == "ReadOnly")
    }

    /// Properties and data types, i.e. members that can be assigned in a property table.
    pub fn is_assignable(&self) -> bool {
        matches!(self.member_type, MemberType::Property | MemberType::DataType)
    }

    pub fn is_event(&self) -> bool {
        self.member_type == MemberType::Event
    }

    pub fn value_type_name(&self) -> Option<&str> {
        self.value_type.as_ref().map(|ty| ty.name.as_str())
    }
}

/// Tags are mostly plain strings, but newer dumps also carry objects such as
/// `{ "PreferredDescriptorName": "..." }`. Objects contribute their keys.
fn deserialize_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut tags = Vec::with_capacity(raw.len());
    for tag in raw {
        match tag {
            Value::String(s) => tags.push(s),
            Value::Object(map) => tags.extend(map.keys().cloned()),
            _ => {}
        }
    }
    Ok(tags)
}
