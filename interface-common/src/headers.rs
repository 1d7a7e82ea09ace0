use std::collections::HashMap;

use tonic::metadata::{Ascii, MetadataMap, MetadataValue};

use crate::consts;
use crate::error::InterfaceError;

/// Abstraction over different header container types. Allows unified header
/// extraction for HTTP (`http::HeaderMap`), gRPC (`MetadataMap`), and plain
/// maps, and any future transport.
pub trait HeaderSource {
    fn get_header(&self, key: &str) -> Option<&str>;
}

impl HeaderSource for HashMap<String, String> {
    fn get_header(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl HeaderSource for http::HeaderMap {
    fn get_header(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|value| value.to_str().ok())
    }
}

impl HeaderSource for MetadataMap {
    fn get_header(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|value| value.to_str().ok())
    }
}

/// Reads a required header, rejecting absence.
pub fn parse_required<'a, H: HeaderSource>(
    headers: &'a H,
    key: &str,
) -> Result<&'a str, InterfaceError> {
    headers
        .get_header(key)
        .ok_or_else(|| InterfaceError::MissingRequiredHeader {
            key: key.to_string(),
        })
}

fn to_metadata_value(key: &str, value: &str) -> Result<MetadataValue<Ascii>, InterfaceError> {
    MetadataValue::try_from(value).map_err(|e| InterfaceError::InvalidHeaderValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Copies the context headers present in `headers` into a gRPC metadata map
/// for an HTTP-to-gRPC hop. Absent headers are skipped; present headers must
/// hold valid metadata values.
pub fn context_headers_to_metadata<H: HeaderSource>(
    headers: &H,
) -> Result<MetadataMap, InterfaceError> {
    let mut metadata = MetadataMap::new();

    for header_name in consts::CONTEXT_HEADERS {
        if let Some(value) = headers.get_header(header_name) {
            let metadata_value = to_metadata_value(header_name, value)?;
            metadata.insert(*header_name, metadata_value);
        }
    }

    Ok(metadata)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn header_map(entries: &[(&str, &str)]) -> http::HeaderMap {
        let mut headers = http::HeaderMap::new();
        for (key, value) in entries {
            headers.insert(
                http::HeaderName::try_from(*key).expect("valid header name"),
                value.parse().expect("valid header value"),
            );
        }
        headers
    }

    #[test]
    fn parse_required_rejects_absence() {
        let headers = header_map(&[]);

        let err = parse_required(&headers, consts::X_USER_ID).unwrap_err();

        assert_eq!(err.to_string(), "Missing required header: x-user-id");
    }

    #[test]
    fn parse_required_reads_present_header() {
        let headers = header_map(&[(consts::X_USER_ID, "user-7")]);

        assert_eq!(parse_required(&headers, consts::X_USER_ID).unwrap(), "user-7");
    }

    #[test]
    fn context_headers_propagate_into_metadata() {
        let headers = header_map(&[
            (consts::X_REQUEST_ID, "req-42"),
            (consts::X_USERNAME, "alice"),
            ("content-type", "application/json"),
        ]);

        let metadata = context_headers_to_metadata(&headers).unwrap();

        assert_eq!(metadata.get_header(consts::X_REQUEST_ID), Some("req-42"));
        assert_eq!(metadata.get_header(consts::X_USERNAME), Some("alice"));
        // Only the context headers travel; absent ones are skipped.
        assert_eq!(metadata.get_header(consts::X_USER_ID), None);
        assert_eq!(metadata.get_header("content-type"), None);
    }

    #[test]
    fn plain_map_source_reads_values() {
        let headers = HashMap::from([(consts::X_USERNAME.to_string(), "bob".to_string())]);

        assert_eq!(headers.get_header(consts::X_USERNAME), Some("bob"));
        assert_eq!(headers.get_header(consts::X_USER_ID), None);
    }
}
