//! Listing response validation

use serde_json::Value;

use crate::error::{Error, Result};
use crate::project::Project;

/// Outcome of decoding a listing body
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// A JSON array whose every element is a valid project
    Records(Vec<Project>),
    /// Well-formed JSON that is not an array; callers treat this as empty
    NotAList(&'static str),
}

impl Listing {
    pub fn into_records(self) -> Vec<Project> {
        match self {
            Self::Records(records) => records,
            Self::NotAList(_) => Vec::new(),
        }
    }
}

/// Decode a listing body into typed projects
///
/// Invalid JSON and array elements that don't match the project schema are
/// errors. A non-array value is not.
pub fn decode_listing(body: &[u8]) -> Result<Listing> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::InvalidResponse(format!("listing is not valid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => return Ok(Listing::NotAList(json_kind(&other))),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Project>(item).map_err(|e| {
                Error::InvalidResponse(format!("listing element {} is not a project: {}", index, e))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Listing::Records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectId;

    #[test]
    fn test_decode_array() {
        let listing = decode_listing(br#"[{"id": 1, "title": "X", "description": "Y"}]"#).unwrap();
        let records = listing.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(ProjectId::Int(1)));
        assert_eq!(records[0].description.as_deref(), Some("Y"));
    }

    #[test]
    fn test_decode_preserves_order() {
        let listing =
            decode_listing(br#"[{"id": 3, "title": "c"}, {"id": 1, "title": "a"}]"#).unwrap();
        let titles: Vec<_> = listing.into_records().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["c", "a"]);
    }

    #[test]
    fn test_decode_object_is_not_a_list() {
        assert_eq!(decode_listing(b"{}").unwrap(), Listing::NotAList("object"));
        assert_eq!(decode_listing(b"null").unwrap(), Listing::NotAList("null"));
        assert!(decode_listing(b"{\"error\": \"x\"}").unwrap().into_records().is_empty());
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_listing(b"<html>Fatal error</html>").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_decode_bad_element() {
        let err = decode_listing(br#"[{"id": 1, "title": "ok"}, 42]"#).unwrap_err();
        match err {
            Error::InvalidResponse(msg) => assert!(msg.contains("element 1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_empty_array() {
        assert_eq!(decode_listing(b"[]").unwrap(), Listing::Records(vec![]));
    }

    #[test]
    fn test_decode_null_columns() {
        let listing = decode_listing(
            br#"[{"id": 1, "title": null, "description": null, "imageSrc": null}, {"id": "2"}]"#,
        )
        .unwrap();
        let records = listing.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "");
        assert_eq!(records[0].description, None);
        assert_eq!(records[0].image_src, None);
        assert_eq!(records[1].id, Some(ProjectId::Text("2".to_string())));
        assert_eq!(records[1].title, "");
    }
}
