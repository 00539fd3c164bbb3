//! Mutable, lazily-materialized JSON documents.
//!
//! A [`Json`] wraps JSON text and only parses the parts that are read or
//! written through it. Reading any path never fails; writing a path that
//! does not exist yet creates the objects and arrays leading to it. The
//! document re-serializes with keys in insertion order and untouched member
//! text copied verbatim, so numbers and formatting of unmodified parts
//! survive a round trip.
//!
//! Strings whose content is itself JSON are stepped through transparently:
//! writes below them re-encode the string.
//!
//! # Example
//!
//! ```
//! use lazy_json::Json;
//!
//! let doc = Json::from_text(r#"{"code":0,"data":"[{\"id\":\"123\"}]"}"#);
//! assert_eq!(doc.get("data[0].id").int(), 123);
//!
//! doc.get("data[0].id").set(&456).unwrap();
//! doc.get("meta.tags[0]").set("new").unwrap();
//! assert_eq!(
//!     doc.raw_string(),
//!     r#"{"code":0,"data":"[{\"id\":456}]","meta":{"tags":["new"]}}"#
//! );
//! ```

mod array;
mod codec;
mod commit;
mod navigate;
mod object;
mod str_json;
mod tree;

pub mod cli;
pub mod coerce;

mod error;
pub use error::Error;

mod json;
pub use json::Json;

pub use lazy_json_path::{parse_path, PathError, PathStep, SmartPath};

/// Report whether `data` is one complete, well-formed JSON value.
pub fn valid(data: impl AsRef<[u8]>) -> bool {
    codec::validate(data.as_ref())
}
