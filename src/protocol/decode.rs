//! Pure decoding: what was read + response shape → payload.
//!
//! No I/O. The session reads exactly what the shape calls for and hands the
//! result here; this module picks out the payload and rejects replies whose
//! framing does not match the shape.

use crate::domain::{IrmError, IrmResult};

use super::ResponseShape;

/// Raw material read from the transport for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawReply {
    /// Nothing was read
    Empty,
    /// CRLF-terminated lines, already trimmed
    Lines(Vec<String>),
    /// Fixed-size read, untrimmed
    Bytes(Vec<u8>),
}

/// Select the payload for `shape` out of `raw`.
///
/// Returns `Ok(None)` for write-only commands.
pub fn decode(shape: ResponseShape, raw: RawReply) -> IrmResult<Option<String>> {
    match (shape, raw) {
        (ResponseShape::None, RawReply::Empty) => Ok(None),
        (ResponseShape::Bytes(n), RawReply::Bytes(bytes)) => {
            if bytes.len() != n {
                return Err(IrmError::Decode(format!(
                    "Expected {n} bytes, got {}",
                    bytes.len()
                )));
            }
            let text = std::str::from_utf8(&bytes)
                .map_err(|e| IrmError::Decode(format!("Invalid UTF-8 response: {e}")))?;
            Ok(Some(text.trim().to_string()))
        }
        (shape, RawReply::Lines(mut lines)) if shape.line_count() > 0 => {
            if lines.len() != shape.line_count() {
                return Err(IrmError::Decode(format!(
                    "Expected {} line(s) for {shape:?}, got {}",
                    shape.line_count(),
                    lines.len()
                )));
            }
            let payload = match shape {
                ResponseShape::Line | ResponseShape::FirstOfTwo => lines.swap_remove(0),
                // Line 1 echoes the command and line 2 is an OK marker;
                // neither is checked.
                _ => lines.swap_remove(2),
            };
            Ok(Some(payload.trim().to_string()))
        }
        (shape, raw) => Err(IrmError::Decode(format!(
            "Reply {raw:?} does not fit response shape {shape:?}"
        ))),
    }
}

/// Parse a decimal integer reply.
pub fn parse_integer(reply: &str) -> IrmResult<i64> {
    reply
        .trim()
        .parse::<i64>()
        .map_err(|e| IrmError::Decode(format!("Failed to parse integer '{reply}': {e}")))
}
