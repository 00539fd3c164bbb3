//! JSON text codec.
//!
//! Thin layer over `serde_json`: decodes one container level into opaque raw
//! member spans, quotes strings, and validates text. Member spans are kept
//! byte-for-byte as they appear in the input, so numbers and nested
//! formatting survive untouched.

use std::fmt;

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::value::RawValue;

/// Report whether `bytes` is one complete JSON value.
pub fn validate(bytes: &[u8]) -> bool {
    serde_json::from_slice::<IgnoredAny>(bytes).is_ok()
}

/// Strip JSON whitespace (space, tab, CR, LF) from both ends.
pub fn trim(bytes: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r');
    let start = bytes.iter().position(|b| !is_ws(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_ws(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Decode the top level of an object into `(key, raw member)` pairs.
///
/// Keys are returned in input order, duplicates included. Returns `None` if
/// the text is not exactly one well-formed object.
pub fn decode_object(bytes: &[u8]) -> Option<Vec<(String, Vec<u8>)>> {
    let entries: ObjectEntries = serde_json::from_slice(bytes).ok()?;
    Some(
        entries
            .0
            .into_iter()
            .map(|(key, raw)| (key, raw.get().as_bytes().to_vec()))
            .collect(),
    )
}

/// Decode the top level of an array into raw member spans.
pub fn decode_array(bytes: &[u8]) -> Option<Vec<Vec<u8>>> {
    let elems: Vec<Box<RawValue>> = serde_json::from_slice(bytes).ok()?;
    Some(elems.into_iter().map(|raw| raw.get().as_bytes().to_vec()).collect())
}

/// Quote and escape `s` as a JSON string. `<`, `>` and `&` pass through.
pub fn encode_str(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() + 2);
    // Writing into a Vec cannot fail and a &str always serializes.
    if serde_json::to_writer(&mut out, s).is_err() {
        out.clear();
        out.extend_from_slice(b"\"\"");
    }
    out
}

/// Unquote a JSON string literal. Returns `None` for anything else.
pub fn unquote(raw: &[u8]) -> Option<String> {
    if raw.first() != Some(&b'"') {
        return None;
    }
    serde_json::from_slice::<String>(raw).ok()
}

/// Object members in order, duplicates kept.
struct ObjectEntries(Vec<(String, Box<RawValue>)>);

impl<'de> Deserialize<'de> for ObjectEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = ObjectEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Box<RawValue>>()? {
                    entries.push(entry);
                }
                Ok(ObjectEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
