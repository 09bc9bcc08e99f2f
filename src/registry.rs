//! Schema tables, keyed by transaction type/version and order version.
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "transactions": [ { "type": 4, "version": 2, "schema": { "object": [...] } } ],
//!   "orders":       [ { "version": 0, "schema": { "object": [...] } } ]
//! }
//! ```
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::SchemaNode;
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawRegistry")]
pub struct SchemaRegistry {
    transactions: BTreeMap<(i64, i64), SchemaNode>,
    orders: BTreeMap<i64, SchemaNode>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry: Self = crate::path_de::from_slice_with_path(&bytes)?;
        debug!(
            path = %path.display(),
            transactions = registry.transactions.len(),
            orders = registry.orders.len(),
            "loaded schema registry"
        );
        Ok(registry)
    }

    pub fn with_transaction(mut self, tx_type: i64, version: i64, schema: SchemaNode) -> Self {
        self.transactions.insert((tx_type, version), schema);
        self
    }

    pub fn with_order(mut self, version: i64, schema: SchemaNode) -> Self {
        self.orders.insert(version, schema);
        self
    }

    pub fn transaction_schema(&self, tx_type: i64, version: i64) -> Result<&SchemaNode> {
        self.transactions
            .get(&(tx_type, version))
            .ok_or(Error::UnknownTransactionSchema { tx_type, version })
    }

    /// Exact version, else the version-0 layout.
    pub fn order_schema(&self, version: i64) -> Result<&SchemaNode> {
        self.orders
            .get(&version)
            .or_else(|| self.orders.get(&0))
            .ok_or(Error::UnknownOrderSchema { version })
    }

    /// Schema for a transaction value, chosen by its `type` and `version`.
    pub fn schema_for_tx(&self, tx: &Value) -> Result<&SchemaNode> {
        let tx_type = tx.get("type").and_then(Value::as_i64).ok_or(Error::MissingField("type"))?;
        let version = tx.get("version").and_then(Value::as_i64).ok_or(Error::MissingField("version"))?;
        debug!(tx_type, version, "selecting transaction schema");
        self.transaction_schema(tx_type, version)
    }

    /// Schema for an order value; a missing `version` means version 0.
    pub fn schema_for_order(&self, order: &Value) -> Result<&SchemaNode> {
        let version = order.get("version").and_then(Value::as_i64).unwrap_or(0);
        debug!(version, "selecting order schema");
        self.order_schema(version)
    }
}

// --------------------------- Config encoding ------------------------------ //

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRegistry {
    #[serde(default)]
    transactions: Vec<TxEntry>,
    #[serde(default)]
    orders: Vec<OrderEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TxEntry {
    #[serde(rename = "type")]
    tx_type: i64,
    version: i64,
    schema: SchemaNode,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OrderEntry {
    version: i64,
    schema: SchemaNode,
}

impl TryFrom<RawRegistry> for SchemaRegistry {
    type Error = Error;

    fn try_from(raw: RawRegistry) -> Result<Self> {
        let mut out = Self::new();
        for e in raw.transactions {
            if out.transactions.insert((e.tx_type, e.version), e.schema).is_some() {
                return Err(Error::DuplicateTransactionSchema { tx_type: e.tx_type, version: e.version });
            }
        }
        for e in raw.orders {
            if out.orders.insert(e.version, e.schema).is_some() {
                return Err(Error::DuplicateOrderSchema { version: e.version });
            }
        }
        Ok(out)
    }
}
