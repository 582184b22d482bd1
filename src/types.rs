use serde_json::{Map, Number, Value as JsonValue};

/// A value in the host runtime's type system.
///
/// The engine never leaks driver types across the host boundary: query
/// results are built from these, and query arguments are passed in as these.
/// Hosts whose value system distinguishes `undefined` from `null` map both
/// to [`HostValue::Null`].
///
/// Object entries preserve insertion order, so a dictionary shaped from a
/// query row keeps its columns in result order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Null,
    Bool(bool),
    /// All host numbers are doubles.
    Num(f64),
    Str(String),
    Arr(Vec<HostValue>),
    Obj(Vec<(String, HostValue)>),
}

impl HostValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let HostValue::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_num(&self) -> Option<f64> {
        if let HostValue::Num(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let HostValue::Str(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_arr(&self) -> Option<&[HostValue]> {
        if let HostValue::Arr(items) = self {
            Some(items)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_obj(&self) -> Option<&[(String, HostValue)]> {
        if let HostValue::Obj(entries) = self {
            Some(entries)
        } else {
            None
        }
    }

    /// Look up an object entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&HostValue> {
        self.as_obj()?
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Type name used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            HostValue::Null => "null",
            HostValue::Bool(_) => "boolean",
            HostValue::Num(_) => "number",
            HostValue::Str(_) => "string",
            HostValue::Arr(_) => "array",
            HostValue::Obj(_) => "object",
        }
    }
}

impl From<HostValue> for JsonValue {
    fn from(value: HostValue) -> Self {
        match value {
            HostValue::Null => JsonValue::Null,
            HostValue::Bool(b) => JsonValue::Bool(b),
            // Non-finite doubles have no JSON form and collapse to null.
            HostValue::Num(n) => Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number),
            HostValue::Str(s) => JsonValue::String(s),
            HostValue::Arr(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            HostValue::Obj(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, entry) in entries {
                    map.insert(key, JsonValue::from(entry));
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl From<JsonValue> for HostValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => HostValue::Null,
            JsonValue::Bool(b) => HostValue::Bool(b),
            JsonValue::Number(n) => n.as_f64().map_or(HostValue::Null, HostValue::Num),
            JsonValue::String(s) => HostValue::Str(s),
            JsonValue::Array(items) => {
                HostValue::Arr(items.into_iter().map(HostValue::from).collect())
            }
            JsonValue::Object(map) => HostValue::Obj(
                map.into_iter()
                    .map(|(key, entry)| (key, HostValue::from(entry)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_lookup_preserves_order() {
        let record = HostValue::Obj(vec![
            ("id".to_string(), HostValue::Str("a1".to_string())),
            ("score".to_string(), HostValue::Num(3.5)),
            ("deleted".to_string(), HostValue::Null),
        ]);

        assert_eq!(record.get("id").and_then(HostValue::as_str), Some("a1"));
        assert_eq!(record.get("score").and_then(HostValue::as_num), Some(3.5));
        assert!(record.get("deleted").is_some_and(HostValue::is_null));
        assert!(record.get("missing").is_none());

        let keys: Vec<&str> = record
            .as_obj()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["id", "score", "deleted"]);
    }

    #[test]
    fn json_round_trip() {
        let json = json!({
            "id": "rec1",
            "flag": true,
            "n": 12.25,
            "tags": ["a", "b"],
            "gone": null,
        });

        let host = HostValue::from(json.clone());
        assert_eq!(host.get("id").and_then(HostValue::as_str), Some("rec1"));
        assert_eq!(host.get("flag").and_then(HostValue::as_bool), Some(true));
        assert_eq!(JsonValue::from(host), json);
    }

    #[test]
    fn non_finite_numbers_become_json_null() {
        assert_eq!(JsonValue::from(HostValue::Num(f64::NAN)), JsonValue::Null);
    }
}
