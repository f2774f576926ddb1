use std::net::SocketAddr;

use wren::Request;

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

fn parse(raw: &str) -> Result<Request, wren::MalformedRequest> {
    Request::parse(raw.as_bytes(), peer())
}

#[cfg(test)]
mod request_line_tests {
    use super::*;

    #[test]
    fn test_well_formed_request_line() {
        let request = parse("GET /index.html HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.uri, "/index.html");
        assert_eq!(request.version, "HTTP/1.1");
        assert_eq!(request.peer, peer());
    }

    #[test]
    fn test_extra_whitespace_in_request_line() {
        let request = parse("GET   /a.html    HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.uri, "/a.html");
        assert_eq!(request.version, "HTTP/1.1");
    }

    #[test]
    fn test_missing_version_is_rejected() {
        assert!(parse("GET /index.html\r\n\r\n").is_err());
    }

    #[test]
    fn test_single_token_is_rejected() {
        assert!(parse("GET\r\n\r\n").is_err());
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        assert!(Request::parse(b"", peer()).is_err());
    }
}

#[cfg(test)]
mod header_tests {
    use super::*;

    #[test]
    fn test_recognized_headers_are_stored() {
        let request = parse(
            "GET / HTTP/1.1\r\n\
             Host: localhost\r\n\
             Accept: text/html\r\n\
             Accept-Language: en-US\r\n\
             Accept-Encoding: gzip\r\n\
             Connection: close\r\n\
             Content-Type: text/plain\r\n\r\n",
        )
        .unwrap();

        assert_eq!(request.host.as_deref(), Some("localhost"));
        assert_eq!(request.accept.as_deref(), Some("text/html"));
        assert_eq!(request.accept_language.as_deref(), Some("en-US"));
        assert_eq!(request.accept_encoding.as_deref(), Some("gzip"));
        assert_eq!(request.connection.as_deref(), Some("close"));
        assert_eq!(request.content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_header_names_are_case_insensitive_and_values_trimmed() {
        let spaced = parse("GET / HTTP/1.1\r\nContent-Type:   text/plain\r\n\r\n").unwrap();
        let tight = parse("GET / HTTP/1.1\r\ncontent-type:text/plain\r\n\r\n").unwrap();
        assert_eq!(spaced.content_type, tight.content_type);
        assert_eq!(spaced.content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_colon_in_header_value() {
        let request = parse("GET / HTTP/1.1\r\nHost: example.com:8080\r\n\r\n").unwrap();
        assert_eq!(request.host.as_deref(), Some("example.com:8080"));
    }

    #[test]
    fn test_unrecognized_headers_are_ignored() {
        let request = parse("GET / HTTP/1.1\r\nX-Custom: whatever\r\n\r\n").unwrap();
        assert!(request.host.is_none());
        assert_eq!(request.content_length, 0);
    }

    #[test]
    fn test_zero_headers() {
        let request = parse("GET /page.html HTTP/1.1\r\n\r\n").unwrap();
        assert!(request.host.is_none());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_content_length_parsed() {
        let request = parse("POST / HTTP/1.1\r\nContent-Length: 11\r\n\r\n").unwrap();
        assert_eq!(request.content_length, 11);
    }

    #[test]
    fn test_unparsable_content_length_defaults_to_zero() {
        let request = parse("POST / HTTP/1.1\r\nContent-Length: many\r\n\r\nhello").unwrap();
        assert_eq!(request.content_length, 0);
        assert!(request.body.is_none());
    }
}

#[cfg(test)]
mod body_tests {
    use super::*;

    #[test]
    fn test_body_present_when_content_length_set() {
        let request =
            parse("POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").unwrap();
        assert_eq!(request.body.as_deref(), Some(&b"hello"[..]));
    }

    #[test]
    fn test_body_capped_at_content_length() {
        let request =
            parse("POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nhello").unwrap();
        assert_eq!(request.body.as_deref(), Some(&b"hel"[..]));
    }

    #[test]
    fn test_short_body_kept_as_received() {
        // The rest of the body would arrive in a later read, which this
        // server does not perform.
        let request =
            parse("POST / HTTP/1.1\r\nContent-Length: 100\r\n\r\npartial").unwrap();
        assert_eq!(request.body.as_deref(), Some(&b"partial"[..]));
    }

    #[test]
    fn test_no_body_bytes_means_no_body() {
        let request = parse("POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\n").unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn test_leading_whitespace_before_body_is_skipped() {
        let request =
            parse("POST / HTTP/1.1\r\nContent-Length: 4\r\n\r\n  \r\ndata").unwrap();
        assert_eq!(request.body.as_deref(), Some(&b"data"[..]));
    }

    #[test]
    fn test_bare_lf_line_endings() {
        let request =
            parse("POST / HTTP/1.1\nContent-Length: 2\n\nok").unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.body.as_deref(), Some(&b"ok"[..]));
    }
}
