use serde::{Deserialize, Deserializer, Serialize};

/// A batch of remote function calls.
#[derive(Debug, Deserialize)]
pub struct DecodeRequest {
    #[serde(default, alias = "requestId")]
    pub request_id: String,
    #[serde(default)]
    pub caller: String,
    #[serde(default, rename = "sessionUser")]
    pub session_user: String,
    /// Absent or `null` means no calls.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub calls: Vec<Vec<String>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    pub replies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_or_null_calls_are_empty() {
        for body in [r#"{"caller": "someone"}"#, r#"{"calls": null}"#] {
            let request: DecodeRequest = serde_json::from_str(body).unwrap();
            assert!(request.calls.is_empty(), "body: {}", body);
        }
    }

    #[test]
    fn test_request_id_accepts_both_spellings() {
        let snake: DecodeRequest = serde_json::from_str(r#"{"request_id": "a1"}"#).unwrap();
        let camel: DecodeRequest = serde_json::from_str(r#"{"requestId": "a1"}"#).unwrap();
        assert_eq!(snake.request_id, "a1");
        assert_eq!(camel.request_id, "a1");
    }
}
