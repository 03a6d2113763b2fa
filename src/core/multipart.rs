//! Single-file extraction from `multipart/form-data` bodies.
//!
//! This is a byte scanner, not a general multipart parser: it walks the body
//! once per delimiter with an explicit cursor and picks the first part that
//! looks like an uploaded file. Nested parts, transfer encodings and
//! non-UTF-8 charsets are not handled.

const FILE_CONTENT_TYPE: &[u8] = b"Content-Type: text/csv";
const FILENAME_ATTR: &[u8] = b"filename=";
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const NEXT_DELIMITER: &[u8] = b"\r\n--";
const CRLF: &[u8] = b"\r\n";
const CLOSE_MARKER: &[u8] = b"--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub content: String,
    /// Position of the part among the delimited segments, starting at 1.
    pub part_index: usize,
    pub filename: Option<String>,
}

/// Returns whatever follows the last `boundary=` in a content type, trimmed.
/// No unquoting is attempted. An empty string means no boundary.
pub fn boundary_from_content_type(content_type: &str) -> &str {
    content_type
        .rsplit_once("boundary=")
        .map(|(_, boundary)| boundary.trim())
        .unwrap_or("")
}

/// Finds the first file part in `body` and decodes its content.
///
/// A part counts as a file when it declares `Content-Type: text/csv` or
/// carries a `filename=` attribute. Parts with empty content are skipped.
/// Returns `None` for an empty boundary, a body without the delimiter, no
/// matching part, or content that is not valid UTF-8.
pub fn extract_file(body: &[u8], boundary: &str) -> Option<ExtractedFile> {
    if boundary.is_empty() || body.is_empty() {
        return None;
    }

    let delimiter = [CLOSE_MARKER, boundary.as_bytes()].concat();

    // index 0 is the preamble before the first delimiter
    for (part_index, part) in Parts::new(body, &delimiter).enumerate().skip(1) {
        if part.starts_with(CLOSE_MARKER) || !is_file_part(part) {
            continue;
        }

        let Some((headers, content)) = split_part(part) else {
            continue;
        };

        return match std::str::from_utf8(content) {
            Ok(text) => Some(ExtractedFile {
                content: text.to_string(),
                part_index,
                filename: filename_from_headers(headers),
            }),
            Err(err) => {
                tracing::debug!(part_index, %err, "file part is not valid UTF-8");
                None
            }
        };
    }

    None
}

/// Builds a single-file upload body. Used by the replay CLI and in tests.
pub fn encode_file_upload(boundary: &str, field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

/// Segments of `body` between occurrences of `delimiter`.
struct Parts<'a> {
    body: &'a [u8],
    delimiter: &'a [u8],
    cursor: Option<usize>,
}

impl<'a> Parts<'a> {
    fn new(body: &'a [u8], delimiter: &'a [u8]) -> Self {
        Self {
            body,
            delimiter,
            cursor: Some(0),
        }
    }
}

impl<'a> Iterator for Parts<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor?;
        match find(self.body, self.delimiter, start) {
            Some(at) => {
                self.cursor = Some(at + self.delimiter.len());
                Some(&self.body[start..at])
            }
            None => {
                self.cursor = None;
                Some(&self.body[start..])
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle, 0).is_some()
}

fn is_file_part(part: &[u8]) -> bool {
    contains(part, FILE_CONTENT_TYPE) || contains(part, FILENAME_ATTR)
}

/// Splits a part into its header block and content. Content starts after
/// the first blank line and stops at the next `\r\n--`, or at the line break
/// that precedes the following delimiter.
fn split_part(part: &[u8]) -> Option<(&[u8], &[u8])> {
    let header_end = find(part, HEADER_TERMINATOR, 0)?;
    let start = header_end + HEADER_TERMINATOR.len();

    let end = match find(part, NEXT_DELIMITER, start) {
        Some(at) => at,
        None if part.ends_with(CRLF) => (part.len() - CRLF.len()).max(start),
        None => part.len(),
    };

    if end <= start {
        return None;
    }

    Some((&part[..header_end], &part[start..end]))
}

fn filename_from_headers(headers: &[u8]) -> Option<String> {
    let at = find(headers, FILENAME_ATTR, 0)?;
    let rest = &headers[at + FILENAME_ATTR.len()..];

    let value = match rest.split_first() {
        Some((&b'"', quoted)) => {
            let close = quoted.iter().position(|&b| b == b'"')?;
            &quoted[..close]
        }
        _ => {
            let stop = rest
                .iter()
                .position(|&b| b == b';' || b == b'\r' || b == b'\n')
                .unwrap_or(rest.len());
            &rest[..stop]
        }
    };

    if value.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(value).trim().to_string())
    }
}
