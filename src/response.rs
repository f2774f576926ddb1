use std::fmt::Write;

const NOT_FOUND_PAGE: &str = "<html><body><h1>Page not found.</h1></body></html>\n";
const METHOD_NOT_ALLOWED_PAGE: &str =
    "<html><body><h1>Sorry, the server does not support this method yet.</h1></body></html>\n";
const FORBIDDEN_PAGE: &str = "<html><body><h1>Forbidden.</h1></body></html>\n";
const INTERNAL_ERROR_PAGE: &str =
    "<html><body><h1>Internal server error.</h1></body></html>\n";

/// One HTTP response: status line, minimal headers, body. Built per
/// request, written to the socket once and dropped.
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub reason: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: Vec<u8>) -> Response {
        Response {
            status: 200,
            reason: "OK",
            body,
        }
    }

    pub fn not_found() -> Response {
        Response {
            status: 404,
            reason: "Not Found",
            body: NOT_FOUND_PAGE.as_bytes().to_vec(),
        }
    }

    pub fn method_not_allowed() -> Response {
        Response {
            status: 405,
            reason: "Method Not Allowed",
            body: METHOD_NOT_ALLOWED_PAGE.as_bytes().to_vec(),
        }
    }

    pub fn forbidden() -> Response {
        Response {
            status: 403,
            reason: "Forbidden",
            body: FORBIDDEN_PAGE.as_bytes().to_vec(),
        }
    }

    pub fn internal_error() -> Response {
        Response {
            status: 500,
            reason: "Internal Server Error",
            body: INTERNAL_ERROR_PAGE.as_bytes().to_vec(),
        }
    }

    /// Render the wire form: status line, headers, blank line, body.
    /// The content type is fixed; this server does not negotiate MIME
    /// types.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut head = String::with_capacity(96);
        let _ = write!(
            head,
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: text/html\r\n\r\n",
            self.status,
            self.reason,
            self.body.len()
        );

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}
