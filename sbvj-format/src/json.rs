//! Conversion between tagged values and `serde_json` values
//!
//! Save files are "versioned JSON", so every tree except those holding
//! non-finite floats has an exact JSON counterpart. Integers stay integers and
//! floats stay floats; map order is kept.

use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::error::{Result, SbvjError};
use crate::value::{Map, Value};

impl Value {
    /// Convert to a JSON value
    pub fn to_json(&self) -> Result<Json> {
        Ok(match self {
            Value::Null => Json::Null,
            Value::Float(f) => Json::Number(Number::from_f64(*f).ok_or_else(|| {
                SbvjError::UnsupportedType(format!("float {f} has no JSON representation"))
            })?),
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number((*i).into()),
            Value::String(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Map(map) => {
                let mut object = JsonMap::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key.clone(), value.to_json()?);
                }
                Json::Object(object)
            }
        })
    }

    /// Build from a JSON value
    pub fn from_json(json: &Json) -> Result<Self> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n
                    .as_f64()
                    .filter(|_| n.is_f64())
                    .map(Value::Float)
                    .ok_or_else(|| {
                        SbvjError::UnsupportedType(format!(
                            "integer {n} does not fit in 64 signed bits"
                        ))
                    })?,
            },
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::List(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Json::Object(object) => {
                let mut map = Map::with_capacity(object.len());
                for (key, value) in object {
                    map.insert(key.clone(), Value::from_json(value)?);
                }
                Value::Map(map)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_roundtrip_keeps_kinds_and_order() {
        let json = json!({
            "zeta": 1,
            "alpha": 1.5,
            "flag": true,
            "none": null,
            "items": [1, "two", [], {}]
        });
        let value = Value::from_json(&json).unwrap();
        assert_eq!(value.get("zeta"), Some(&Value::Int(1)));
        assert_eq!(value.get("alpha"), Some(&Value::Float(1.5)));

        let keys: Vec<&String> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "flag", "none", "items"]);

        assert_eq!(value.to_json().unwrap(), json);
    }

    #[test]
    fn test_non_finite_float_rejected() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Value::Float(f).to_json(),
                Err(SbvjError::UnsupportedType(_))
            ));
        }
    }

    #[test]
    fn test_out_of_range_integer_rejected() {
        let json = json!(u64::MAX);
        assert!(matches!(
            Value::from_json(&json),
            Err(SbvjError::UnsupportedType(_))
        ));
    }
}
