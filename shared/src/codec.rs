//! Gateway response envelope decoding
//!
//! The portal answers every login request with a callback-style wrapper:
//! ```text
//! <anything>(<json>)
//! ```
//! where `<json>` carries the `result`, `msg` and `ret_code` string fields.
//! When `result` is not `"1"` the `msg` field is base64 encoded.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can occur while decoding a gateway response
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed envelope: no trailing parenthesized payload")]
    MalformedEnvelope,

    #[error("Payload decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of a login attempt as reported by the gateway
///
/// Absent and `null` fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodedResult {
    /// `"1"` on success, `"0"` on failure
    #[serde(rename = "result", deserialize_with = "null_as_empty")]
    pub result_flag: String,
    /// Gateway message, already base64-decoded for failures when possible
    #[serde(rename = "msg", deserialize_with = "null_as_empty")]
    pub message: String,
    /// Numeric return code as a string
    #[serde(rename = "ret_code", deserialize_with = "null_as_empty")]
    pub return_code: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Standard alphabet with padding; non-zero trailing bits are accepted
const MESSAGE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

impl DecodedResult {
    /// Check whether the gateway reported a successful login
    pub fn is_success(&self) -> bool {
        self.result_flag == "1"
    }
}

/// Decode a raw gateway body into a [`DecodedResult`]
///
/// The payload is the text between an opening `(` and the final `)` of the
/// buffer. Opening positions are tried left to right so that a prefix
/// containing its own parentheses still yields the trailing payload.
pub fn decode(body: &[u8]) -> Result<DecodedResult, CodecError> {
    let trimmed = trim_trailing_whitespace(body);

    let close = match trimmed.last() {
        Some(b')') => trimmed.len() - 1,
        _ => return Err(CodecError::MalformedEnvelope),
    };

    let mut first_error = None;
    for open in trimmed[..close]
        .iter()
        .enumerate()
        .filter_map(|(i, b)| (*b == b'(').then_some(i))
    {
        match serde_json::from_slice::<DecodedResult>(&trimmed[open + 1..close]) {
            Ok(mut result) => {
                if !result.is_success() {
                    result.message = decode_message(&result.message);
                }
                return Ok(result);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(CodecError::Decode(e)),
        None => Err(CodecError::MalformedEnvelope),
    }
}

/// Base64-decode a failure message, keeping the raw text if it is not valid
/// base64 or does not decode to UTF-8.
///
/// Line breaks inside the encoded text are skipped.
pub fn decode_message(raw: &str) -> String {
    let encoded: String = raw.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    MESSAGE_ENGINE
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| raw.to_string())
}

fn trim_trailing_whitespace(buf: &[u8]) -> &[u8] {
    let end = buf
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &buf[..end]
}
