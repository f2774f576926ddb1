use std::fmt;
use std::net::SocketAddr;

/// The request line could not be split into method, URI and version.
#[derive(Debug, PartialEq, Eq)]
pub struct MalformedRequest;

impl fmt::Display for MalformedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("malformed request line")
    }
}

impl std::error::Error for MalformedRequest {}

/// One parsed HTTP request, built from the bytes of a single socket read.
///
/// Only the headers the server cares about are kept in dedicated fields;
/// everything else is dropped during parsing.
#[derive(Debug)]
pub struct Request {
    pub method: String,
    pub uri: String,
    pub version: String,
    pub host: Option<String>,
    pub accept: Option<String>,
    pub accept_language: Option<String>,
    pub accept_encoding: Option<String>,
    pub connection: Option<String>,
    pub content_type: Option<String>,
    pub content_length: usize,
    pub body: Option<Vec<u8>>,
    pub peer: SocketAddr,
}

impl Request {
    /// Parse the raw bytes of one read into a `Request`. Fails only when
    /// the request line is missing one of its three tokens; header lines
    /// that do not look like headers are skipped, not rejected.
    pub fn parse(buf: &[u8], peer: SocketAddr) -> Result<Request, MalformedRequest> {
        let (head, rest) = split_head_body(buf);
        let head = String::from_utf8_lossy(head);
        let mut lines = head.lines();

        let request_line = lines.next().ok_or(MalformedRequest)?;
        let mut tokens = request_line.split_whitespace();
        let method = tokens.next().ok_or(MalformedRequest)?.to_string();
        let uri = tokens.next().ok_or(MalformedRequest)?.to_string();
        let version = tokens.next().ok_or(MalformedRequest)?.to_string();

        let mut request = Request {
            method,
            uri,
            version,
            host: None,
            accept: None,
            accept_language: None,
            accept_encoding: None,
            connection: None,
            content_type: None,
            content_length: 0,
            body: None,
            peer,
        };

        for line in lines {
            if line.trim().is_empty() {
                break;
            }
            // The first colon splits name from value; later colons belong
            // to the value.
            let (name, value) = match line.split_once(':') {
                Some(pair) => pair,
                None => continue,
            };
            let name = name.to_ascii_lowercase();
            let value = value.trim_start();

            match name.as_str() {
                "host" => request.host = Some(value.to_string()),
                "accept" => request.accept = Some(value.to_string()),
                "accept-language" => request.accept_language = Some(value.to_string()),
                "accept-encoding" => request.accept_encoding = Some(value.to_string()),
                "connection" => request.connection = Some(value.to_string()),
                "content-type" => request.content_type = Some(value.to_string()),
                "content-length" => {
                    request.content_length = value.parse().unwrap_or(0);
                }
                _ => {}
            }
        }

        if request.content_length > 0 {
            // Whatever of the body arrived in this read; a body split
            // across reads is not reassembled.
            let start = rest
                .iter()
                .position(|b| !b.is_ascii_whitespace())
                .unwrap_or(rest.len());
            let body = &rest[start..];
            let body = &body[..body.len().min(request.content_length)];
            if !body.is_empty() {
                request.body = Some(body.to_vec());
            }
        }

        Ok(request)
    }
}

/// Split the buffer at the blank line ending the header block. Without a
/// blank line the whole buffer is head and the body is empty.
fn split_head_body(buf: &[u8]) -> (&[u8], &[u8]) {
    if let Some(i) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
        (&buf[..i], &buf[i + 4..])
    } else if let Some(i) = buf.windows(2).position(|w| w == b"\n\n") {
        (&buf[..i], &buf[i + 2..])
    } else {
        (buf, &[])
    }
}
