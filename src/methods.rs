//! Transaction and order entry points: pick the schema from the registry,
//! convert wide fields, then parse or write.
//!
//! The `_with` forms take the caller's converter and are generic over its
//! error type; codec failures convert into it through `From<Error>`.
use crate::convert::{map_wide_fields, numeral_string};
use crate::error::{Error, Result};
use crate::parse::parse;
use crate::registry::SchemaRegistry;
use crate::ser::stringify;
use crate::value::Value;

/// Precision-safe parse. Wide fields that do not fit a double arrive as
/// numeral strings; smaller ones stay numbers.
pub fn parse_tx(text: &str) -> Result<Value> {
    parse(text)
}

/// Parse, then hand every wide field of the transaction to `to_long`.
pub fn parse_tx_with<F, E>(text: &str, registry: &SchemaRegistry, to_long: F) -> Result<Value, E>
where
    F: FnMut(&Value) -> Result<Value, E>,
    E: From<Error>,
{
    let tx = parse(text)?;
    let schema = registry.schema_for_tx(&tx)?;
    map_wide_fields(&tx, schema, to_long)
}

/// Write a transaction with its wide fields as bare numerals. Wide fields
/// must hold integer numbers or numeral strings.
pub fn stringify_tx(tx: &Value, registry: &SchemaRegistry) -> Result<String> {
    stringify_tx_with(tx, registry, numeral_string)
}

/// Write a transaction, turning wide fields into numeral strings with
/// `from_long` first.
pub fn stringify_tx_with<F, E>(tx: &Value, registry: &SchemaRegistry, from_long: F) -> Result<String, E>
where
    F: FnMut(&Value) -> Result<Value, E>,
    E: From<Error>,
{
    let schema = registry.schema_for_tx(tx)?;
    let converted = map_wide_fields(tx, schema, from_long)?;
    Ok(stringify(&converted, schema))
}

pub fn parse_order(text: &str) -> Result<Value> {
    parse(text)
}

pub fn parse_order_with<F, E>(text: &str, registry: &SchemaRegistry, to_long: F) -> Result<Value, E>
where
    F: FnMut(&Value) -> Result<Value, E>,
    E: From<Error>,
{
    let order = parse(text)?;
    let schema = registry.schema_for_order(&order)?;
    map_wide_fields(&order, schema, to_long)
}

pub fn stringify_order(order: &Value, registry: &SchemaRegistry) -> Result<String> {
    stringify_order_with(order, registry, numeral_string)
}

pub fn stringify_order_with<F, E>(order: &Value, registry: &SchemaRegistry, from_long: F) -> Result<String, E>
where
    F: FnMut(&Value) -> Result<Value, E>,
    E: From<Error>,
{
    let schema = registry.schema_for_order(order)?;
    let converted = map_wide_fields(order, schema, from_long)?;
    Ok(stringify(&converted, schema))
}
