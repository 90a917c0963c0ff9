//! The decode pipeline: each call carries a base64 string whose bytes are an
//! S2 framed stream. Calls decode in order and the batch fails on the first
//! bad call.

mod block;
mod frame;
mod stream;

pub use block::BlockError;
pub use frame::{FrameError, FrameReader, masked_checksum};
pub use stream::decode_stream;

use crate::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("call has no payload argument")]
    MissingPayload,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid compressed stream: {0}")]
    Stream(#[source] std::io::Error),
}

/// Decodes a single call. Only the first argument is read; line breaks in
/// the base64 text are ignored.
pub fn decode_call(call: &[String]) -> std::result::Result<String, DecodeError> {
    let payload = call.first().ok_or(DecodeError::MissingPayload)?;
    let compressed = if payload.contains(['\r', '\n']) {
        let unwrapped: String = payload
            .chars()
            .filter(|c| !matches!(c, '\r' | '\n'))
            .collect();
        STANDARD.decode(unwrapped)?
    } else {
        STANDARD.decode(payload)?
    };
    decode_stream(&compressed)
}

/// Decodes every call in order, stopping at the first failure.
pub fn decode_calls(calls: &[Vec<String>]) -> Result<Vec<String>> {
    calls
        .iter()
        .enumerate()
        .map(|(index, call)| decode_call(call).map_err(|e| Error::decode(index, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HELLO: &str = "/wYAAHNOYVBwWQEJAACK7rm+SGVsbG8=";
    const WORLD: &str = "/wYAAHNOYVBwWQEKAACyu7oiV29ybGQh";

    fn call(payload: &str) -> Vec<String> {
        vec![payload.to_string()]
    }

    #[test]
    fn test_decode_calls_preserves_order() {
        let calls = vec![call(WORLD), call(HELLO), call(WORLD)];
        let replies = decode_calls(&calls).unwrap();
        assert_eq!(replies, vec!["World!", "Hello", "World!"]);
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let calls = vec![vec![HELLO.to_string(), "ignored".to_string()]];
        assert_eq!(decode_calls(&calls).unwrap(), vec!["Hello"]);
    }

    #[test]
    fn test_empty_batch() {
        assert!(decode_calls(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_base64_is_reported() {
        let err = decode_call(&call("not base64!")).unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn test_line_wrapped_base64_is_accepted() {
        let wrapped = format!("{}\r\n{}\n", &HELLO[..16], &HELLO[16..]);
        assert_eq!(decode_call(&call(&wrapped)).unwrap(), "Hello");
    }

    #[test]
    fn test_missing_payload_is_reported() {
        let err = decode_call(&[]).unwrap_err();
        assert!(matches!(err, DecodeError::MissingPayload));
    }

    #[test]
    fn test_first_failure_aborts_batch() {
        // "aGVsbG8=" is valid base64 but not a framed stream.
        let calls = vec![call(HELLO), call("aGVsbG8="), call("%%%")];
        match decode_calls(&calls) {
            Err(Error::Decode { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(source, DecodeError::Stream(_)));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }
}
