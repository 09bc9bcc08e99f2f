//! Schema-driven JSON for transactions and orders with integer amounts wider
//! than a double can hold.
//!
//! Wide fields travel as numeral strings in memory and as bare numeric
//! literals on the wire. [`stringify`] decides per string leaf, from the
//! schema and the data around it, whether to write it bare; [`parse`] keeps
//! every digit of oversized integers.
pub mod classify;
pub mod cli;
pub mod convert;
pub mod error;
pub mod methods;
pub mod parse;
pub mod path_de;
pub mod registry;
pub mod resolve;
pub mod schema;
pub mod ser;
pub mod value;

pub use classify::{classify, is_wide_integer, Classification};
pub use convert::{apply_long_fields, convert_long_fields, map_wide_fields, numeral_string};
pub use error::{Error, Result};
pub use methods::{
    parse_order, parse_order_with, parse_tx, parse_tx_with, stringify_order, stringify_order_with,
    stringify_tx, stringify_tx_with,
};
pub use parse::parse;
pub use registry::SchemaRegistry;
pub use resolve::resolve;
pub use schema::{AnyOf, AnyOfBranch, SchemaNode};
pub use ser::{stringify, stringify_plain, stringify_with_config, StringifyConfig};
pub use value::Value;
