//! Response handling
//!
//! Every way a response can fail to produce JSON maps to an [`EmptyReason`];
//! none of them is an error.

use serde_json::Value;
use tracing::warn;

use crate::outcome::EmptyReason;
use crate::transport::{Response, TransportError};

/// Parsed body of a successful response
pub(crate) fn read_json(
    url: &str,
    result: Result<Response, TransportError>,
) -> Result<Value, EmptyReason> {
    let response = result.map_err(|e| {
        warn!("Request to {} failed: {}", url, e);
        EmptyReason::Transport(e.to_string())
    })?;

    if !response.is_success() {
        warn!("{} responded with status {}", url, response.status);
        return Err(EmptyReason::Status(response.status));
    }

    if response.body.trim().is_empty() {
        warn!("{} responded with an empty body", url);
        return Err(EmptyReason::EmptyBody);
    }

    serde_json::from_str(&response.body).map_err(|e| {
        warn!("Malformed JSON from {}: {}", url, e);
        EmptyReason::MalformedJson(e.to_string())
    })
}

/// Whether a body can be applied to a record
pub(crate) fn is_record(json: &Value) -> bool {
    json.as_object().is_some_and(|object| !object.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Method;
    use serde_json::json;

    const URL: &str = "http://example.com/tasks";

    #[test]
    fn test_read_json() {
        let json = read_json(URL, Ok(Response::ok(r#"{"id": 1}"#))).unwrap();
        assert_eq!(json, json!({ "id": 1 }));
    }

    #[test]
    fn test_read_json_failures() {
        assert_eq!(
            read_json(URL, Ok(Response::new(422, r#"{"errors": []}"#))),
            Err(EmptyReason::Status(422))
        );
        assert_eq!(
            read_json(URL, Ok(Response::ok("  "))),
            Err(EmptyReason::EmptyBody)
        );
        assert!(matches!(
            read_json(URL, Ok(Response::ok("{\"id\": 1"))),
            Err(EmptyReason::MalformedJson(_))
        ));

        let not_stubbed = TransportError::NotStubbed {
            method: Method::Get,
            url: URL.to_string(),
        };
        assert!(matches!(
            read_json(URL, Err(not_stubbed)),
            Err(EmptyReason::Transport(_))
        ));
    }

    #[test]
    fn test_is_record() {
        assert!(is_record(&json!({ "id": 1 })));
        assert!(!is_record(&json!({})));
        assert!(!is_record(&json!([{ "id": 1 }])));
        assert!(!is_record(&json!(null)));
    }
}
