//! Compact JSON writer driven by a schema.
//!
//! Emits text straight from the value graph. Each string leaf is classified
//! against the schema and, when wide, written bare as a numeric literal.
//! There is no failure mode: anything the schema does not cover is quoted,
//! undefined members are dropped.
use crate::classify::{is_literal_type_tag, is_wide_integer};
use crate::error::{Error, Result};
use crate::schema::SchemaNode;
use crate::value::{iso_timestamp, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringifyConfig {
    /// Reject values nested deeper than this many containers.
    pub max_depth: Option<usize>,
}

/// Serialize `value`, emitting every string leaf the schema marks wide
/// unquoted. A top-level `Undefined` yields the empty string.
pub fn stringify(value: &Value, schema: &SchemaNode) -> String {
    let mut w = Writer { schema: Some(schema), root: value, out: String::new() };
    w.value(value, None);
    w.out
}

/// Like [`stringify`], but enforces `config` first.
pub fn stringify_with_config(
    value: &Value,
    schema: &SchemaNode,
    config: &StringifyConfig,
) -> Result<String> {
    if let Some(limit) = config.max_depth {
        if exceeds_depth(value, limit) {
            return Err(Error::DepthLimitExceeded { limit });
        }
    }
    Ok(stringify(value, schema))
}

/// Schema-less serialization: every string is quoted.
pub fn stringify_plain(value: &Value) -> String {
    let mut w = Writer { schema: None, root: value, out: String::new() };
    w.value(value, None);
    w.out
}

// ------------------------------- Internals -------------------------------- //

/// Absolute position of the value being written, as a chain of borrowed
/// parents. Each level owns its own link; nothing is shared or mutated.
struct Path<'a> {
    parent: Option<&'a Path<'a>>,
    key: &'a str,
}

impl<'a> Path<'a> {
    fn segments(&self) -> Vec<&'a str> {
        let mut out = vec![self.key];
        let mut cur = self.parent;
        while let Some(p) = cur {
            out.push(p.key);
            cur = p.parent;
        }
        out.reverse();
        out
    }
}

struct Writer<'s, 'v> {
    schema: Option<&'s SchemaNode>,
    root: &'v Value,
    out: String,
}

impl Writer<'_, '_> {
    fn value(&mut self, v: &Value, path: Option<&Path<'_>>) {
        match v {
            Value::Undefined => {}
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.out.push_str(&n.to_string()),
            Value::Date(d) => self.quoted(&iso_timestamp(d)),
            Value::String(s) => self.string(s, path),
            Value::Array(xs) => self.array(xs, path),
            Value::Object(map) => {
                self.out.push('{');
                let mut first = true;
                for (key, member) in map {
                    if member.is_undefined() {
                        continue;
                    }
                    if !first {
                        self.out.push(',');
                    }
                    first = false;
                    self.quoted(key);
                    self.out.push(':');
                    self.value(member, Some(&Path { parent: path, key: key.as_str() }));
                }
                self.out.push('}');
            }
        }
    }

    fn array(&mut self, xs: &[Value], path: Option<&Path<'_>>) {
        self.out.push('[');
        for (i, item) in xs.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            if item.is_undefined() {
                self.out.push_str("null");
                continue;
            }
            let key = i.to_string();
            self.value(item, Some(&Path { parent: path, key: &key }));
        }
        self.out.push(']');
    }

    fn string(&mut self, s: &str, path: Option<&Path<'_>>) {
        let Some(schema) = self.schema else {
            return self.quoted(s);
        };
        let segments = path.map(Path::segments).unwrap_or_default();
        if is_literal_type_tag(&segments, s) {
            return self.quoted(s);
        }
        if is_wide_integer(&segments, schema, self.root) {
            // numeral text is the caller's responsibility at this point
            self.out.push_str(s);
        } else {
            self.quoted(s);
        }
    }

    fn quoted(&mut self, s: &str) {
        // serializing a str into a String never fails
        if let Ok(text) = serde_json::to_string(s) {
            self.out.push_str(&text);
        }
    }
}

fn exceeds_depth(v: &Value, limit: usize) -> bool {
    match v {
        Value::Array(xs) => limit == 0 || xs.iter().any(|x| exceeds_depth(x, limit - 1)),
        Value::Object(map) => limit == 0 || map.values().any(|x| exceeds_depth(x, limit - 1)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AnyOfBranch;
    use crate::value::Map;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn data(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn wide_fields_are_emitted_bare() {
        let schema = SchemaNode::object([("id", SchemaNode::scalar()), ("amount", SchemaNode::long())]);
        let v = data(json!({"id": "x", "amount": "9007199254740993"}));
        assert_eq!(stringify(&v, &schema), r#"{"id":"x","amount":9007199254740993}"#);
    }

    #[test]
    fn undefined_members_are_omitted_and_array_slots_become_null() {
        let mut map = Map::new();
        map.insert("a".into(), Value::from(1i64));
        map.insert("skip".into(), Value::Undefined);
        map.insert("xs".into(), Value::Array(vec![Value::from("q"), Value::Undefined, Value::Null]));
        map.insert("last".into(), Value::Undefined);
        let out = stringify(&Value::Object(map), &SchemaNode::scalar());
        assert_eq!(out, r#"{"a":1,"xs":["q",null,null]}"#);
    }

    #[test]
    fn top_level_undefined_is_empty() {
        assert_eq!(stringify(&Value::Undefined, &SchemaNode::long()), "");
    }

    #[test]
    fn call_arg_type_tag_stays_quoted() {
        let arg = SchemaNode::any_of("type", [
            ("integer", AnyOfBranch::wrapped(SchemaNode::long())),
            ("string", AnyOfBranch::wrapped(SchemaNode::scalar())),
        ]);
        let schema = SchemaNode::object([(
            "call",
            SchemaNode::object([("function", SchemaNode::scalar()), ("args", SchemaNode::array(arg))]),
        )]);
        let v = data(json!({"call": {"function": "f", "args": [
            {"type": "integer", "value": "9223372036854775807"},
            {"type": "string", "value": "hi"}
        ]}}));
        assert_eq!(
            stringify(&v, &schema),
            r#"{"call":{"function":"f","args":[{"type":"integer","value":9223372036854775807},{"type":"string","value":"hi"}]}}"#
        );
    }

    #[test]
    fn any_of_branch_decides_quoting() {
        let schema = SchemaNode::any_of("type", [
            ("A", AnyOfBranch::wrapped(SchemaNode::object([("amount", SchemaNode::long())]))),
            ("B", AnyOfBranch::wrapped(SchemaNode::object([("amount", SchemaNode::scalar())]))),
        ]);
        let a = data(json!({"type": "A", "value": {"amount": "12345678901234567890"}}));
        let b = data(json!({"type": "B", "value": {"amount": "12345678901234567890"}}));
        assert_eq!(stringify(&a, &schema), r#"{"type":"A","value":{"amount":12345678901234567890}}"#);
        assert_eq!(stringify(&b, &schema), r#"{"type":"B","value":{"amount":"12345678901234567890"}}"#);
    }

    #[test]
    fn scalars_use_json_literals() {
        let mut map = Map::new();
        map.insert("t".into(), Value::Bool(true));
        map.insert("n".into(), Value::Null);
        map.insert("f".into(), data(json!(1.5)));
        map.insert("d".into(), Value::Date(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()));
        map.insert("s".into(), Value::from("line\n\"quoted\"\u{1}"));
        map.insert("k\"ey".into(), Value::from("x"));
        let out = stringify_plain(&Value::Object(map));
        assert_eq!(
            out,
            r#"{"t":true,"n":null,"f":1.5,"d":"2021-03-04T05:06:07.000Z","s":"line\n\"quoted\"\u0001","k\"ey":"x"}"#
        );
    }

    #[test]
    fn schema_less_strings_stay_quoted() {
        let schema = SchemaNode::object([("amount", SchemaNode::long())]);
        let v = data(json!({"other": "123", "nested": {"amount": "5"}}));
        assert_eq!(stringify(&v, &schema), r#"{"other":"123","nested":{"amount":"5"}}"#);
    }

    #[test]
    fn numbers_keep_their_literal_text() {
        let v = data(json!({"fee": 100000, "big": 123456789012345678901234567890u128}));
        assert_eq!(stringify_plain(&v), r#"{"fee":100000,"big":123456789012345678901234567890}"#);
    }

    #[test]
    fn depth_limit_is_enforced_when_configured() {
        let v = data(json!({"a": {"b": {"c": 1}}}));
        let schema = SchemaNode::scalar();
        let tight = StringifyConfig { max_depth: Some(2) };
        let loose = StringifyConfig { max_depth: Some(3) };
        assert!(matches!(
            stringify_with_config(&v, &schema, &tight),
            Err(Error::DepthLimitExceeded { limit: 2 })
        ));
        assert_eq!(stringify_with_config(&v, &schema, &loose).unwrap(), r#"{"a":{"b":{"c":1}}}"#);
        assert!(stringify_with_config(&v, &schema, &StringifyConfig::default()).is_ok());
    }

    #[test]
    fn shared_schema_across_threads() {
        let schema = SchemaNode::object([("amount", SchemaNode::long())]);
        let outputs: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let schema = &schema;
                    scope.spawn(move || {
                        let v = data(json!({"amount": format!("1000000000000000000{i}")}));
                        stringify(&v, schema)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(outputs[3], r#"{"amount":10000000000000000003}"#);
    }
}
