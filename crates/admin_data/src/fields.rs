//! Field access with legacy key fallbacks. Several collections carry both
//! camelCase and snake_case spellings from before the schema settled.

use firestore_rest::Document;

pub(crate) fn first_str<'a>(doc: &'a Document, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| doc.str_field(k))
}

pub(crate) fn first_int(doc: &Document, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| doc.int_field(k))
}
