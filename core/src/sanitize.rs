//! Structured payload recovery.
//!
//! Probes may print informational lines ahead of their JSON document even
//! with stderr discarded. The first line whose first non-whitespace character
//! opens an object or array anchors the payload; everything before it is
//! dropped and everything from it onward is kept verbatim. This is a
//! syntactic cut only. Whether the result actually parses is decided later
//! by [`report::classify`](crate::report::classify).

use std::fmt;

/// The structured-data suffix of a capture. May be empty.
///
/// The anchor is located in the raw bytes, so the payload is exactly the
/// captured suffix whenever that suffix is valid UTF-8. Invalid sequences
/// after the anchor are replaced with U+FFFD, so only then does the payload
/// differ from the captured bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanitizedPayload(String);

impl SanitizedPayload {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SanitizedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the suffix of `raw` starting at the first line that opens a
/// structured document, or an empty payload when no such line exists.
pub fn sanitize(raw: &[u8]) -> SanitizedPayload {
    match payload_start(raw) {
        Some(offset) => SanitizedPayload(String::from_utf8_lossy(&raw[offset..]).into_owned()),
        None => SanitizedPayload::empty(),
    }
}

fn payload_start(raw: &[u8]) -> Option<usize> {
    let mut offset: usize = 0;

    for line in raw.split_inclusive(|b| *b == b'\n') {
        if opens_document(line) {
            return Some(offset);
        }
        offset += line.len();
    }

    None
}

fn opens_document(line: &[u8]) -> bool {
    matches!(line.trim_ascii_start().first(), Some(b'{' | b'['))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_noise() {
        let payload = sanitize(b"warn: x\nwarn: y\n{\"a\":1}");
        assert_eq!(payload.as_str(), "{\"a\":1}");
    }

    #[test]
    fn no_opening_line_yields_empty() {
        assert!(sanitize(b"connection refused").is_empty());
        assert!(sanitize(b"").is_empty());
        assert!(sanitize(b"\n\n   \n").is_empty());
    }

    #[test]
    fn keeps_truncated_document() {
        assert_eq!(sanitize(b"{\"a\":").as_str(), "{\"a\":");
    }

    #[test]
    fn array_opens_payload() {
        let payload = sanitize(b"scanning...\n[1, 2]\n");
        assert_eq!(payload.as_str(), "[1, 2]\n");
    }

    #[test]
    fn indented_opening_line_counts() {
        let payload = sanitize(b"banner\n   {\n  \"ok\": true\n}\n");
        assert_eq!(payload.as_str(), "   {\n  \"ok\": true\n}\n");
    }

    #[test]
    fn brace_inside_noise_line_is_not_an_anchor() {
        let payload = sanitize(b"note: use {json}\n{\"b\":2}");
        assert_eq!(payload.as_str(), "{\"b\":2}");
    }

    #[test]
    fn everything_after_anchor_is_kept() {
        let raw = b"x\n{\"a\":1}\ntrailing noise\n";
        assert_eq!(sanitize(raw).as_str(), "{\"a\":1}\ntrailing noise\n");
    }

    #[test]
    fn crlf_lines_are_handled() {
        let payload = sanitize(b"info\r\n{\"a\":1}\r\n");
        assert_eq!(payload.as_str(), "{\"a\":1}\r\n");
    }

    #[test]
    fn invalid_utf8_in_noise_does_not_panic() {
        let payload = sanitize(b"\xff\xfe garbage\n{\"a\":1}");
        assert_eq!(payload.as_str(), "{\"a\":1}");
    }

    #[test]
    fn valid_suffix_is_kept_byte_for_byte() {
        let raw = "note: ü\n{\"name\":\"Grüße\"}\n".as_bytes();
        let payload = sanitize(raw);
        assert_eq!(payload.as_str().as_bytes(), &raw[9..]);
    }

    #[test]
    fn invalid_utf8_after_anchor_is_replaced() {
        let payload = sanitize(b"{\"a\":\"\xff\"}");
        assert_eq!(payload.as_str(), "{\"a\":\"\u{FFFD}\"}");
    }
}
