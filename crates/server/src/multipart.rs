//! Multipart form decoder
//!
//! A byte-oriented scanner over the raw request body, deliberately not a
//! full MIME implementation: split on the boundary delimiter, pattern-match
//! the disposition parameters, keep part content byte-for-byte. File bytes
//! must round-trip exactly; audio payloads are full of values a text
//! decoding would mangle.

use std::collections::HashMap;

use thiserror::Error;

/// Multipart decoding errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MultipartError {
    #[error("content-type is missing a multipart boundary parameter")]
    MissingBoundary,
}

/// A part that declared a filename
#[derive(Debug, Clone)]
pub struct FilePart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Decoded multipart form: text fields and file attachments by field name
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, FilePart>,
}

impl MultipartForm {
    /// Text field value by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// File attachment by name
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.files.get(name)
    }
}

/// Scanner position within the body
enum ScanState {
    /// Looking for the next boundary delimiter
    SeekingBoundary,
    /// Between a delimiter and the blank line that ends the part headers
    ReadingHeaders,
    /// Consuming part content up to the next delimiter.
    /// `name` is `None` when the part carried no disposition header; its
    /// content is consumed and discarded.
    ReadingBody {
        name: Option<String>,
        filename: Option<String>,
    },
}

/// Decode a multipart body given the request's content-type header value.
///
/// Parts with a `filename` disposition parameter are files, even when their
/// content is empty; parts without one are text fields, whatever their
/// content-type. Parts with no disposition header are skipped. A truncated
/// body (no closing delimiter) yields the parts that were complete.
pub fn parse(body: &[u8], content_type: &str) -> Result<MultipartForm, MultipartError> {
    let boundary = boundary_param(content_type).ok_or(MultipartError::MissingBoundary)?;
    let delimiter: Vec<u8> = [b"--" as &[u8], boundary.as_bytes()].concat();

    let mut form = MultipartForm::default();
    let mut pos = 0usize;
    let mut state = ScanState::SeekingBoundary;

    loop {
        state = match state {
            ScanState::SeekingBoundary => {
                let Some(idx) = find(body, &delimiter, pos) else {
                    break;
                };
                pos = idx + delimiter.len();
                if body[pos..].starts_with(b"--") {
                    // Closing delimiter
                    break;
                }
                if body[pos..].starts_with(b"\r\n") {
                    pos += 2;
                }
                ScanState::ReadingHeaders
            }
            ScanState::ReadingHeaders => {
                let Some(blank) = find(body, b"\r\n\r\n", pos) else {
                    break;
                };
                let headers = &body[pos..blank];
                pos = blank + 4;
                let (name, filename) = disposition(headers);
                ScanState::ReadingBody { name, filename }
            }
            ScanState::ReadingBody { name, filename } => {
                let Some(end) = find(body, &delimiter, pos) else {
                    break;
                };
                // Content runs to the line terminator preceding the delimiter
                let mut content = &body[pos..end];
                if content.ends_with(b"\r\n") {
                    content = &content[..content.len() - 2];
                }

                if let Some(name) = name {
                    match filename {
                        Some(filename) => {
                            form.files.insert(
                                name,
                                FilePart {
                                    filename,
                                    bytes: content.to_vec(),
                                },
                            );
                        }
                        None => {
                            form.fields
                                .insert(name, String::from_utf8_lossy(content).into_owned());
                        }
                    }
                }

                pos = end;
                ScanState::SeekingBoundary
            }
        };
    }

    Ok(form)
}

/// Extract the boundary parameter from a content-type header value
fn boundary_param(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("boundary="))
        .map(|value| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// Pull `name` and `filename` out of a part's Content-Disposition header
fn disposition(headers: &[u8]) -> (Option<String>, Option<String>) {
    let text = String::from_utf8_lossy(headers);
    for line in text.split("\r\n") {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("content-disposition") {
            return (header_param(value, "name"), header_param(value, "filename"));
        }
    }
    (None, None)
}

/// Pattern-match a `key="value"` (or bare `key=value`) disposition parameter
fn header_param(header: &str, key: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|segment| {
        segment
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|value| value.trim().trim_matches('"').to_string())
    })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|idx| idx + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a form the way a browser does, for round-trip tests
    fn encode(boundary: &str, fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, value) in fields {
            out.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, filename, bytes) in files {
            out.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            out.extend_from_slice(bytes);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        out
    }

    fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={boundary}")
    }

    #[test]
    fn test_round_trip_preserves_file_bytes_exactly() {
        // Every byte value, including NUL, high bytes, and embedded CRLF
        let mut payload: Vec<u8> = (0u8..=255).collect();
        payload.extend_from_slice(b"\r\nmore\r\n");

        let body = encode(
            "xYzBoundary123",
            &[("question", "Describe a place"), ("duration", "42.5")],
            &[("audio", "answer.webm", &payload)],
        );
        let form = parse(&body, &content_type("xYzBoundary123")).unwrap();

        assert_eq!(form.field("question"), Some("Describe a place"));
        assert_eq!(form.field("duration"), Some("42.5"));

        let file = form.file("audio").unwrap();
        assert_eq!(file.filename, "answer.webm");
        assert_eq!(file.bytes, payload);
    }

    #[test]
    fn test_missing_boundary_is_an_error() {
        let err = parse(b"irrelevant", "multipart/form-data").unwrap_err();
        assert_eq!(err, MultipartError::MissingBoundary);

        let err = parse(b"irrelevant", "multipart/form-data; boundary=").unwrap_err();
        assert_eq!(err, MultipartError::MissingBoundary);
    }

    #[test]
    fn test_quoted_boundary_accepted() {
        let body = encode("abc", &[("part", "2")], &[]);
        let form = parse(&body, "multipart/form-data; boundary=\"abc\"").unwrap();
        assert_eq!(form.field("part"), Some("2"));
    }

    #[test]
    fn test_empty_file_is_still_a_file() {
        let body = encode("bnd", &[], &[("audio", "empty.wav", b"")]);
        let form = parse(&body, &content_type("bnd")).unwrap();

        let file = form.file("audio").unwrap();
        assert_eq!(file.filename, "empty.wav");
        assert!(file.bytes.is_empty());
        assert!(form.field("audio").is_none());
    }

    #[test]
    fn test_part_with_content_type_but_no_filename_is_a_field() {
        let boundary = "bnd";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"notes\"\r\nContent-Type: text/plain\r\n\r\nhello there\r\n--{boundary}--\r\n"
        );
        let form = parse(body.as_bytes(), &content_type(boundary)).unwrap();

        assert_eq!(form.field("notes"), Some("hello there"));
        assert!(form.file("notes").is_none());
    }

    #[test]
    fn test_part_without_disposition_is_skipped() {
        let boundary = "bnd";
        let body = format!(
            "--{boundary}\r\nContent-Type: text/plain\r\n\r\norphan content\r\n--{boundary}--\r\n"
        );
        let form = parse(body.as_bytes(), &content_type(boundary)).unwrap();
        assert!(form.fields.is_empty());
        assert!(form.files.is_empty());
    }

    #[test]
    fn test_preamble_before_first_boundary_ignored() {
        let boundary = "bnd";
        let body = format!(
            "this is a preamble\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"q\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
        );
        let form = parse(body.as_bytes(), &content_type(boundary)).unwrap();
        assert_eq!(form.field("q"), Some("value"));
    }

    #[test]
    fn test_truncated_body_keeps_complete_parts() {
        let boundary = "bnd";
        // Second part never sees a closing delimiter
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"q\"\r\n\r\nvalue\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"broken\"\r\n\r\ndangling"
        );
        let form = parse(body.as_bytes(), &content_type(boundary)).unwrap();
        assert_eq!(form.field("q"), Some("value"));
        assert!(form.field("broken").is_none());
    }

    #[test]
    fn test_filename_param_not_confused_with_name() {
        // "filename" must not match when looking for "name"
        let header = " form-data; filename=\"a.wav\"";
        assert_eq!(header_param(header, "name"), None);
        assert_eq!(header_param(header, "filename"), Some("a.wav".to_string()));
    }
}
