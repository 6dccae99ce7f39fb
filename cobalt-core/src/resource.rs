//! Resource - Representing resources and their state

use std::collections::HashMap;

/// Unique identifier for a resource within a configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Resource type (e.g., "resource_group", "netapp_volume")
    pub resource_type: String,
    /// Binding name declared in configuration
    pub name: String,
}

impl ResourceId {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// Attribute value of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Convert to a JSON value for persistence
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => {
                let mut object = serde_json::Map::new();
                for (k, v) in map {
                    object.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(object)
            }
        }
    }

    /// Convert from a JSON value; `Null` and non-integral numbers have no
    /// attribute representation and return `None`
    pub fn from_json(value: &serde_json::Value) -> Option<Value> {
        match value {
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            serde_json::Value::Number(n) => n.as_i64().map(Value::Int),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Array(items) => Some(Value::List(
                items.iter().filter_map(Value::from_json).collect(),
            )),
            serde_json::Value::Object(object) => {
                let mut map = HashMap::new();
                for (k, v) in object {
                    if let Some(converted) = Value::from_json(v) {
                        map.insert(k.clone(), converted);
                    }
                }
                Some(Value::Map(map))
            }
            serde_json::Value::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Desired state declared in configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub attributes: HashMap<String, Value>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(resource_type, name),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Current state fetched from the cloud
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: ResourceId,
    /// Canonical resource identifier (the full ARM ID path)
    pub identifier: Option<String>,
    pub attributes: HashMap<String, Value>,
    /// Whether the remote resource exists
    pub exists: bool,
}

impl State {
    pub fn not_found(id: ResourceId) -> Self {
        Self {
            id,
            identifier: None,
            attributes: HashMap::new(),
            exists: false,
        }
    }

    pub fn existing(id: ResourceId, attributes: HashMap<String, Value>) -> Self {
        Self {
            id,
            identifier: None,
            attributes,
            exists: true,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_json_round_trip() {
        let mut map = HashMap::new();
        map.insert("environment".to_string(), Value::String("prod".to_string()));
        let value = Value::Map(map);

        let json = value.to_json();
        assert_eq!(Value::from_json(&json), Some(value));
    }

    #[test]
    fn value_from_json_drops_null() {
        assert_eq!(Value::from_json(&serde_json::Value::Null), None);
    }

    #[test]
    fn value_from_json_integer() {
        assert_eq!(
            Value::from_json(&serde_json::json!(107374182400i64)),
            Some(Value::Int(107374182400))
        );
    }

    #[test]
    fn resource_id_display() {
        let id = ResourceId::new("resource_group", "primary");
        assert_eq!(id.to_string(), "resource_group.primary");
    }

    #[test]
    fn state_with_identifier() {
        let state = State::existing(ResourceId::new("resource_group", "primary"), HashMap::new())
            .with_identifier("/subscriptions/sub-1/resourceGroups/primary-rg");
        assert!(state.exists);
        assert_eq!(
            state.identifier.as_deref(),
            Some("/subscriptions/sub-1/resourceGroups/primary-rg")
        );
    }
}
