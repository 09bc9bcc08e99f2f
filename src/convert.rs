//! Map over the wide-integer leaves of a value.
//!
//! Leaves are found with the same classifier the serializer uses, evaluated
//! against the input value as data root. Converter errors are returned as is.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::is_wide_leaf;
use crate::error::Error;
use crate::parse::is_unsafe_integer;
use crate::schema::SchemaNode;
use crate::value::Value;

static NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").expect("static regex"));

/// Copy of `value` with `f` applied to every wide leaf. Containers, `null`
/// and undefined members are never handed to `f`.
pub fn map_wide_fields<F, E>(value: &Value, schema: &SchemaNode, mut f: F) -> Result<Value, E>
where
    F: FnMut(&Value) -> Result<Value, E>,
{
    let mut path = Vec::new();
    map_at(value, &mut path, schema, value, &mut f)
}

/// Single-converter form used on the parse side.
pub fn apply_long_fields<F, E>(value: &Value, schema: &SchemaNode, converter: F) -> Result<Value, E>
where
    F: FnMut(&Value) -> Result<Value, E>,
{
    map_wide_fields(value, schema, converter)
}

/// Run `to_long` then `from_long` over the wide leaves; either may be absent.
pub fn convert_long_fields<E>(
    value: &Value,
    schema: &SchemaNode,
    to_long: Option<&mut dyn FnMut(&Value) -> Result<Value, E>>,
    from_long: Option<&mut dyn FnMut(&Value) -> Result<Value, E>>,
) -> Result<Value, E> {
    let mut out = value.clone();
    if let Some(f) = to_long {
        out = map_wide_fields(&out, schema, f)?;
    }
    if let Some(f) = from_long {
        out = map_wide_fields(&out, schema, f)?;
    }
    Ok(out)
}

/// Stock converter: integer numbers and numeral strings become numeral
/// strings, the form the serializer writes bare.
pub fn numeral_string(v: &Value) -> Result<Value, Error> {
    match v {
        Value::String(s) if NUMERAL.is_match(s) => Ok(v.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() || is_unsafe_integer(n) => {
            Ok(Value::String(n.to_string()))
        }
        Value::String(s) => Err(Error::NotANumeral(s.clone())),
        other => Err(Error::NotANumeral(other.to_json().to_string())),
    }
}

fn map_at<F, E>(
    v: &Value,
    path: &mut Vec<String>,
    schema: &SchemaNode,
    root: &Value,
    f: &mut F,
) -> Result<Value, E>
where
    F: FnMut(&Value) -> Result<Value, E>,
{
    match v {
        Value::Array(xs) => {
            let mut out = Vec::with_capacity(xs.len());
            for (i, x) in xs.iter().enumerate() {
                path.push(i.to_string());
                let mapped = map_at(x, path, schema, root, f);
                path.pop();
                out.push(mapped?);
            }
            Ok(Value::Array(out))
        }
        Value::Object(map) => {
            let mut out = crate::value::Map::with_capacity(map.len());
            for (k, x) in map {
                path.push(k.clone());
                let mapped = map_at(x, path, schema, root, f);
                path.pop();
                out.insert(k.clone(), mapped?);
            }
            Ok(Value::Object(out))
        }
        Value::Undefined | Value::Null => Ok(v.clone()),
        leaf if is_wide_leaf(path.as_slice(), leaf, schema, root) => f(leaf),
        leaf => Ok(leaf.clone()),
    }
}
