//! Backend resource collections shown by the dashboard

use super::field::{FieldSpec, Shortener};
use crate::error::FetchError;
use serde_json::Value;

/// Characters of a blob shown in its table cell
const BLOB_PREVIEW: usize = 64;

/// One of the collections served by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    History,
    Blobs,
    Relays,
    Errors,
}

impl Resource {
    /// Tab order in the dashboard
    pub fn all() -> Vec<Resource> {
        vec![
            Resource::History,
            Resource::Blobs,
            Resource::Relays,
            Resource::Errors,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Resource::History => "Public Keys",
            Resource::Blobs => "Encrypted Blobs",
            Resource::Relays => "Relays",
            Resource::Errors => "Errors",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Resource::History => "/history",
            Resource::Blobs => "/blob",
            Resource::Relays => "/relay",
            Resource::Errors => "/errors",
        }
    }

    /// Column definitions for this collection's table
    pub fn fields(&self) -> Vec<FieldSpec> {
        match self {
            Resource::History => vec![
                FieldSpec::did().at("/history/id"),
                FieldSpec::date("Changed").at("/history/changed"),
                FieldSpec::fill("Signer").at("/history/signer"),
                FieldSpec::fill("Signers")
                    .with_accessor(|row| join_strings(row.pointer("/history/signers"))),
                FieldSpec::fill("Signatures")
                    .with_accessor(|row| join_strings(row.get("signatures"))),
            ],
            Resource::Blobs => vec![
                FieldSpec::did().at("/otp_data/id"),
                FieldSpec::fill("Blob")
                    .at("/otp_data/blob")
                    .with_shortener(Shortener::Elide(BLOB_PREVIEW)),
            ],
            Resource::Relays => vec![
                FieldSpec::fill("Host").at("/host_address"),
                FieldSpec::fill("Port"),
                FieldSpec::fill("Name"),
                FieldSpec::fill("Main"),
                FieldSpec::id("UID", ""),
                FieldSpec::fill("Status"),
            ],
            Resource::Errors => vec![
                FieldSpec::fill("Title"),
                FieldSpec::fill("Message").at("/msg"),
                // logged either as an ISO string or as epoch microseconds
                FieldSpec::epoch("Time"),
            ],
        }
    }

    /// Extract the rows from a response body
    ///
    /// Relays come back as a map keyed by relay id; everything else is
    /// wrapped as `{"data": [...]}`.
    pub fn parse(&self, body: Value) -> Result<Vec<Value>, FetchError> {
        let Value::Object(mut map) = body else {
            return Err(FetchError::UnexpectedShape {
                path: self.path().to_string(),
            });
        };

        match self {
            Resource::Relays => Ok(map.into_iter().map(|(_, relay)| relay).collect()),
            _ => match map.remove("data") {
                Some(Value::Array(rows)) => Ok(rows),
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(_) => Err(FetchError::UnexpectedShape {
                    path: self.path().to_string(),
                }),
            },
        }
    }
}

/// Join the string values of a list or map with ", "
fn join_strings(value: Option<&Value>) -> Value {
    let parts: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().map(plain).collect(),
        Some(Value::Object(map)) => map.values().map(plain).collect(),
        Some(other) => vec![plain(other)],
        None => Vec::new(),
    };
    Value::String(parts.join(", "))
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cells(resource: Resource, row: &Value) -> Vec<String> {
        resource.fields().iter().map(|f| f.cell(row).full).collect()
    }

    #[test]
    fn test_enveloped_parse() {
        let body = json!({"data": [{"title": "a"}, {"title": "b"}]});
        let rows = Resource::Errors.parse(body).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_envelope_yields_no_rows() {
        let rows = Resource::Blobs.parse(json!({"other": 1})).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_relay_map_parse_keeps_order() {
        let body = json!({
            "2": {"name": "beta"},
            "1": {"name": "alpha"}
        });
        let rows = Resource::Relays.parse(body).unwrap();
        assert_eq!(rows, vec![json!({"name": "beta"}), json!({"name": "alpha"})]);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let err = Resource::History.parse(json!([1, 2])).unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedShape { ref path } if path == "/history"));
        assert!(Resource::Errors.parse(json!({"data": "nope"})).is_err());
    }

    #[test]
    fn test_error_fields() {
        let row = json!({
            "title": "Relay Unreachable.",
            "msg": "Could not establish a connection with relay servers.",
            "time": "2000-01-01T11:00:00+00:00"
        });
        assert_eq!(
            cells(Resource::Errors, &row),
            vec![
                "Relay Unreachable.",
                "Could not establish a connection with relay servers.",
                "2000-01-01T11:00:00+00:00"
            ]
        );
    }

    #[test]
    fn test_error_time_accepts_epoch_micros() {
        let row = json!({"title": "Late", "msg": "m", "time": 1_525_737_600_000_000i64});
        assert_eq!(cells(Resource::Errors, &row)[2], "2018-05-08T00:00:00.000Z");
    }

    #[test]
    fn test_relay_fields() {
        let row = json!({
            "host_address": "127.0.0.1",
            "port": 7541,
            "name": "alpha",
            "main": true,
            "uid": "1",
            "status": "connected"
        });
        assert_eq!(
            cells(Resource::Relays, &row),
            vec!["127.0.0.1", "7541", "alpha", "true", "1", "connected"]
        );
    }

    #[test]
    fn test_blob_fields() {
        let row = json!({"otp_data": {"id": "did:dad:Qt27", "blob": "AeYb"}});
        assert_eq!(cells(Resource::Blobs, &row), vec!["Qt27", "AeYb"]);
    }

    #[test]
    fn test_long_blob_is_previewed() {
        let blob = "A".repeat(200);
        let row = json!({"otp_data": {"id": "did:dad:Qt27", "blob": blob}});
        let cell = Resource::Blobs.fields()[1].cell(&row);
        assert_eq!(cell.full.len(), 200);
        assert_eq!(cell.short.chars().count(), BLOB_PREVIEW);
        assert!(cell.short.ends_with('…'));
    }

    #[test]
    fn test_history_fields_join_lists() {
        let row = json!({
            "history": {
                "id": "did:dad:Qt27",
                "changed": "2000-01-01T00:00:00+00:00",
                "signer": 2,
                "signers": ["Qt27", "Xq5Y", "dZ74"]
            },
            "signatures": {"signer": "AeYb", "rotation": "o9yj"}
        });
        assert_eq!(
            cells(Resource::History, &row),
            vec![
                "Qt27",
                "2000-01-01T00:00:00+00:00",
                "2",
                "Qt27, Xq5Y, dZ74",
                "AeYb, o9yj"
            ]
        );

        let listed = json!({"history": {}, "signatures": ["a", "b"]});
        assert_eq!(cells(Resource::History, &listed)[4], "a, b");
        assert_eq!(cells(Resource::History, &listed)[3], "");
    }

    #[test]
    fn test_titles_and_paths() {
        let titles: Vec<&str> = Resource::all().iter().map(|r| r.title()).collect();
        assert_eq!(titles, vec!["Public Keys", "Encrypted Blobs", "Relays", "Errors"]);
        assert_eq!(Resource::Blobs.path(), "/blob");
        assert_eq!(Resource::Relays.path(), "/relay");
    }
}
