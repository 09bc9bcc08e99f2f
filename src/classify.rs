//! Decide whether the leaf at a path is a wide integer.
//!
//! The schema is walked in lockstep with the path. Variant nodes (`ByType`,
//! `AnyOf`) pick their branch from the *data*: the record holding the
//! discriminant is re-resolved from the data root at the absolute path prefix
//! consumed so far, so classification depends on (path, schema, data root).
//!
//! Every input classifies; anything the schema does not describe is simply
//! not wide.
//!
//! One rule sits outside the schema walk: a script-invocation argument
//! `call.args[i].type` whose value is the literal `"integer"` is a type tag,
//! not a number. The argument union wraps its payload in `value` without
//! checking the segment name, so the tag's path would otherwise classify as
//! the wide payload. See [`is_literal_type_tag`]. The rule is specific to
//! invoke-script calls and is not generalized to other schemas.
use tracing::{debug, trace};

use crate::resolve::{resolve, segment};
use crate::schema::SchemaNode;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Wide primitive: emit unquoted, convert on parse.
    Wide,
    /// Plain primitive.
    Plain,
    /// The path leaves the shape the schema describes.
    NoSchema,
    /// A variant node found no branch for the data's discriminant.
    NoVariant,
}

impl Classification {
    pub fn is_wide(self) -> bool {
        matches!(self, Classification::Wide)
    }
}

/// `true` iff `path` names a wide-integer leaf of `schema` for this data.
pub fn is_wide_integer<K: AsRef<str>>(path: &[K], schema: &SchemaNode, root: &Value) -> bool {
    classify(path, schema, root).is_wide()
}

pub fn classify<K: AsRef<str>>(path: &[K], schema: &SchemaNode, root: &Value) -> Classification {
    let out = walk(path, 0, schema, root);
    if tracing::enabled!(tracing::Level::TRACE) {
        let dotted = path.iter().map(segment).collect::<Vec<_>>().join(".");
        trace!(path = %dotted, result = ?out, "classified");
    }
    out
}

/// `["call", "args", <i>, "type"]` holding `"integer"`.
pub fn is_literal_type_tag<K: AsRef<str>>(path: &[K], value: &str) -> bool {
    value == "integer"
        && matches!(
            path,
            [call, args, _, ty]
                if segment(call) == "call" && segment(args) == "args" && segment(ty) == "type"
        )
}

/// Wide-leaf test for an arbitrary leaf value, honouring the literal type
/// tag rule. Used wherever leaves are mapped rather than written.
pub fn is_wide_leaf<K: AsRef<str>>(path: &[K], leaf: &Value, schema: &SchemaNode, root: &Value) -> bool {
    if let Value::String(s) = leaf {
        if is_literal_type_tag(path, s) {
            return false;
        }
    }
    is_wide_integer(path, schema, root)
}

// `depth` segments of `path` have been consumed to reach `node`.
fn walk<K: AsRef<str>>(path: &[K], depth: usize, node: &SchemaNode, root: &Value) -> Classification {
    let rest = &path[depth..];
    match node {
        SchemaNode::Primitive { wide } if rest.is_empty() => {
            if *wide { Classification::Wide } else { Classification::Plain }
        }
        SchemaNode::Primitive { .. } => Classification::NoSchema,
        SchemaNode::Object { .. } => {
            match rest.first().and_then(|key| node.field(segment(key))) {
                Some(field) => walk(path, depth + 1, field, root),
                None => Classification::NoSchema,
            }
        }
        SchemaNode::Array { items } => {
            if rest.is_empty() {
                return Classification::NoSchema;
            }
            walk(path, depth + 1, items, root)
        }
        SchemaNode::ByType { variants } => {
            if rest.first().map(segment) != Some("value") {
                return Classification::NoSchema;
            }
            let tag = resolve(&path[..depth], root)
                .and_then(|record| record.get("type"))
                .and_then(Value::as_i64);
            match tag.and_then(|t| variants.get(&t)) {
                Some(variant) => walk(path, depth + 1, variant, root),
                None => {
                    debug!(?tag, "no variant for record type");
                    Classification::NoVariant
                }
            }
        }
        SchemaNode::AnyOf(any) => {
            let branch = resolve(&path[..depth], root)
                .and_then(|obj| obj.get(&any.discriminator))
                .and_then(|key| any.item_by_key(key));
            let Some(branch) = branch else {
                debug!(discriminator = %any.discriminator, "no branch for discriminant");
                return Classification::NoVariant;
            };
            if !branch.has_value_wrapper {
                return walk(path, depth, &branch.schema, root);
            }
            if rest.is_empty() {
                return Classification::NoSchema;
            }
            walk(path, depth + 1, &branch.schema, root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AnyOfBranch;
    use serde_json::json;

    fn data(v: serde_json::Value) -> Value {
        Value::from(v)
    }

    #[test]
    fn object_fields_and_primitives() {
        let schema = SchemaNode::object([("id", SchemaNode::scalar()), ("amount", SchemaNode::long())]);
        let root = data(json!({"id": "x", "amount": "9007199254740993"}));
        assert_eq!(classify(&["amount"], &schema, &root), Classification::Wide);
        assert_eq!(classify(&["id"], &schema, &root), Classification::Plain);
        assert_eq!(classify(&["other"], &schema, &root), Classification::NoSchema);
    }

    #[test]
    fn paths_past_or_short_of_the_schema_are_not_wide() {
        let schema = SchemaNode::object([("transfers", SchemaNode::array(SchemaNode::object([
            ("amount", SchemaNode::long()),
        ])))]);
        let root = data(json!({"transfers": [{"amount": "1"}]}));
        assert!(is_wide_integer(&["transfers", "0", "amount"], &schema, &root));
        assert!(!is_wide_integer(&["transfers", "0", "amount", "deeper"], &schema, &root));
        assert!(!is_wide_integer(&["transfers"], &schema, &root));
        assert!(!is_wide_integer::<&str>(&[], &schema, &root));
    }

    #[test]
    fn array_index_does_not_matter() {
        let schema = SchemaNode::array(SchemaNode::long());
        let root = data(json!(["1", "2"]));
        assert!(is_wide_integer(&["0"], &schema, &root));
        assert!(is_wide_integer(&["999"], &schema, &root));
    }

    #[test]
    fn by_type_reads_the_sibling_type_tag() {
        let entry = SchemaNode::by_type([(0, SchemaNode::long()), (1, SchemaNode::scalar())]);
        let schema = SchemaNode::object([("data", SchemaNode::array(entry))]);
        let root = data(json!({"data": [
            {"key": "a", "type": 0, "value": "12345678901234567890"},
            {"key": "b", "type": 1, "value": "true"},
            {"key": "c", "type": 9, "value": "1"}
        ]}));
        assert!(is_wide_integer(&["data", "0", "value"], &schema, &root));
        assert!(!is_wide_integer(&["data", "1", "value"], &schema, &root));
        assert_eq!(classify(&["data", "2", "value"], &schema, &root), Classification::NoVariant);
        assert_eq!(classify(&["data", "0", "key"], &schema, &root), Classification::NoSchema);
    }

    #[test]
    fn by_type_without_a_usable_record_has_no_variant() {
        let schema = SchemaNode::by_type([(0, SchemaNode::long())]);
        let untagged = data(json!({"value": "1"}));
        let string_tag = data(json!({"type": "0", "value": "1"}));
        assert_eq!(classify(&["value"], &schema, &untagged), Classification::NoVariant);
        assert_eq!(classify(&["value"], &schema, &string_tag), Classification::NoVariant);
        assert_eq!(classify(&["value"], &schema, &data(json!("1"))), Classification::NoVariant);
        assert_eq!(classify(&["value"], &schema, &data(json!([0, "1"]))), Classification::NoVariant);
    }

    #[test]
    fn containers_reached_with_nothing_left_are_not_wide() {
        let wrapped = SchemaNode::any_of("type", [("A", AnyOfBranch::wrapped(SchemaNode::long()))]);
        let root = data(json!({"type": "A", "value": "1"}));
        assert!(is_wide_integer(&["value"], &wrapped, &root));
        assert_eq!(classify::<&str>(&[], &wrapped, &root), Classification::NoSchema);

        let list = SchemaNode::array(SchemaNode::long());
        assert_eq!(classify::<&str>(&[], &list, &data(json!(["1"]))), Classification::NoSchema);
        assert_eq!(classify::<&str>(&[], &list, &data(json!("1"))), Classification::NoSchema);
    }

    #[test]
    fn by_type_only_resolves_the_value_segment() {
        let schema = SchemaNode::by_type([(0, SchemaNode::long())]);
        let root = data(json!({"type": 0, "value": "1", "other": "1"}));
        assert!(is_wide_integer(&["value"], &schema, &root));
        assert!(!is_wide_integer(&["other"], &schema, &root));
    }

    #[test]
    fn any_of_with_value_wrapper() {
        let branch_a = SchemaNode::object([("amount", SchemaNode::long())]);
        let branch_b = SchemaNode::object([("amount", SchemaNode::scalar())]);
        let schema = SchemaNode::any_of("type", [
            ("A", AnyOfBranch::wrapped(branch_a)),
            ("B", AnyOfBranch::wrapped(branch_b)),
        ]);
        let a = data(json!({"type": "A", "value": {"amount": "12345678901234567890"}}));
        let b = data(json!({"type": "B", "value": {"amount": "12345678901234567890"}}));
        let c = data(json!({"type": "C", "value": {"amount": "12345678901234567890"}}));
        assert!(is_wide_integer(&["value", "amount"], &schema, &a));
        assert!(!is_wide_integer(&["value", "amount"], &schema, &b));
        assert_eq!(classify(&["value", "amount"], &schema, &c), Classification::NoVariant);
    }

    #[test]
    fn non_canonical_indices_find_no_discriminant() {
        let arg = SchemaNode::any_of("type", [("integer", AnyOfBranch::wrapped(SchemaNode::long()))]);
        let schema = SchemaNode::object([("args", SchemaNode::array(arg))]);
        let root = data(json!({"args": [{"type": "integer", "value": "1"}]}));
        assert!(is_wide_integer(&["args", "0", "value"], &schema, &root));
        for index in ["+0", "00", "-0", " 0"] {
            assert_eq!(classify(&["args", index, "value"], &schema, &root), Classification::NoVariant, "{index}");
        }
    }

    #[test]
    fn any_of_in_place_governs_the_object_itself() {
        let schema = SchemaNode::object([("orders", SchemaNode::array(SchemaNode::any_of("version", [
            ("1", AnyOfBranch::in_place(SchemaNode::object([("price", SchemaNode::scalar())]))),
            ("2", AnyOfBranch::in_place(SchemaNode::object([("price", SchemaNode::long())]))),
        ])))]);
        let root = data(json!({"orders": [
            {"version": 1, "price": "10"},
            {"version": 2, "price": "10"}
        ]}));
        assert!(!is_wide_integer(&["orders", "0", "price"], &schema, &root));
        assert!(is_wide_integer(&["orders", "1", "price"], &schema, &root));
    }

    #[test]
    fn discriminant_on_a_non_object_is_not_wide() {
        let schema = SchemaNode::any_of("type", [("A", AnyOfBranch::in_place(SchemaNode::long()))]);
        assert!(!is_wide_integer::<&str>(&[], &schema, &data(json!("123"))));
    }

    #[test]
    fn literal_type_tag_only_at_call_args() {
        assert!(is_literal_type_tag(&["call", "args", "0", "type"], "integer"));
        assert!(!is_literal_type_tag(&["call", "args", "0", "type"], "string"));
        assert!(!is_literal_type_tag(&["call", "args", "0", "type", "x"], "integer"));
        assert!(!is_literal_type_tag(&["call", "params", "0", "type"], "integer"));
    }

    #[test]
    fn wide_leaf_excludes_the_type_tag() {
        let arg = SchemaNode::any_of("type", [("integer", AnyOfBranch::wrapped(SchemaNode::long()))]);
        let schema = SchemaNode::object([("call", SchemaNode::object([("args", SchemaNode::array(arg))]))]);
        let root = data(json!({"call": {"args": [{"type": "integer", "value": "5"}]}}));
        let tag = ["call", "args", "0", "type"];
        assert!(is_wide_integer(&tag, &schema, &root));
        assert!(!is_wide_leaf(&tag, &Value::from("integer"), &schema, &root));
        assert!(is_wide_leaf(&["call", "args", "0", "value"], &Value::from("5"), &schema, &root));
    }
}
