//! Declarative shape of a transaction/order, annotated with which leaves are
//! wide integers.
//!
//! Trees are built once (from code or a registry file) and only ever read.
//! Nothing here looks at data; see `classify` for the walk.
use std::borrow::Cow;
use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub enum SchemaNode {
    /// Leaf scalar. `wide` marks a number that must survive without rounding.
    Primitive { wide: bool },
    /// Fixed-shape record, looked up by name (first match wins).
    Object { fields: Vec<(String, SchemaNode)> },
    /// Homogeneous sequence.
    Array { items: Box<SchemaNode> },
    /// A `value` field whose shape is picked by the integer `type` of the
    /// record that holds it.
    ByType { variants: BTreeMap<i64, SchemaNode> },
    /// Tagged union picked by a discriminator field of the data object.
    AnyOf(AnyOf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnyOf {
    pub discriminator: String,
    pub items: IndexMap<String, AnyOfBranch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnyOfBranch {
    pub schema: SchemaNode,
    /// The branch governs a nested wrapper field (conventionally `value`)
    /// rather than the object itself.
    pub has_value_wrapper: bool,
}

// ------------------------------ Builders ---------------------------------- //

impl SchemaNode {
    pub fn scalar() -> Self {
        SchemaNode::Primitive { wide: false }
    }

    pub fn long() -> Self {
        SchemaNode::Primitive { wide: true }
    }

    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaNode::Object {
            fields: fields.into_iter().map(|(k, s)| (k.into(), s)).collect(),
        }
    }

    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::Array { items: Box::new(items) }
    }

    pub fn by_type<I>(variants: I) -> Self
    where
        I: IntoIterator<Item = (i64, SchemaNode)>,
    {
        SchemaNode::ByType { variants: variants.into_iter().collect() }
    }

    pub fn any_of<D, K, I>(discriminator: D, items: I) -> Self
    where
        D: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (K, AnyOfBranch)>,
    {
        SchemaNode::AnyOf(AnyOf {
            discriminator: discriminator.into(),
            items: items.into_iter().map(|(k, b)| (k.into(), b)).collect(),
        })
    }

    /// Field schema of an `Object` node; `None` for other kinds.
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Object { fields } => {
                fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
            }
            _ => None,
        }
    }

    /// Parse a schema tree from its JSON encoding; errors carry the JSON path.
    pub fn from_json_str(src: &str) -> crate::Result<Self> {
        crate::path_de::from_str_with_path(src)
    }
}

impl AnyOfBranch {
    pub fn wrapped(schema: SchemaNode) -> Self {
        Self { schema, has_value_wrapper: true }
    }

    pub fn in_place(schema: SchemaNode) -> Self {
        Self { schema, has_value_wrapper: false }
    }
}

impl AnyOf {
    /// Branch for a discriminant read off the data.
    pub fn item_by_key(&self, key: &Value) -> Option<&AnyOfBranch> {
        let key = discriminant_key(key)?;
        self.items.get(key.as_ref())
    }
}

/// Branch keys are text: strings as is, numbers by their literal, booleans as
/// `true`/`false`. Other kinds never select a branch.
pub fn discriminant_key(v: &Value) -> Option<Cow<'_, str>> {
    match v {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

// --------------------------- Config encoding ------------------------------ //

// Externally tagged on purpose: internally tagged/untagged enums buffer their
// input, which mangles numbers under `arbitrary_precision`.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawNode {
    Long,
    Scalar,
    Primitive {
        #[serde(default)]
        wide: bool,
    },
    Object(Vec<(String, SchemaNode)>),
    Array(Box<SchemaNode>),
    ByType(BTreeMap<i64, SchemaNode>),
    AnyOf(RawAnyOf),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnyOf {
    #[serde(default = "default_discriminator")]
    discriminator: String,
    #[serde(default)]
    value_field: Option<String>,
    items: IndexMap<String, SchemaNode>,
}

fn default_discriminator() -> String {
    "type".to_owned()
}

impl From<RawNode> for SchemaNode {
    fn from(raw: RawNode) -> Self {
        match raw {
            RawNode::Long => SchemaNode::long(),
            RawNode::Scalar => SchemaNode::scalar(),
            RawNode::Primitive { wide } => SchemaNode::Primitive { wide },
            RawNode::Object(fields) => SchemaNode::Object { fields },
            RawNode::Array(items) => SchemaNode::Array { items },
            RawNode::ByType(variants) => SchemaNode::ByType { variants },
            RawNode::AnyOf(raw) => {
                let has_value_wrapper = raw.value_field.is_some();
                SchemaNode::AnyOf(AnyOf {
                    discriminator: raw.discriminator,
                    items: raw
                        .items
                        .into_iter()
                        .map(|(k, schema)| (k, AnyOfBranch { schema, has_value_wrapper }))
                        .collect(),
                })
            }
        }
    }
}
