/// An outbound provider call, described as a plain value.
///
/// Every provider endpoint this crate talks to is a POST, so a request is
/// just a URL, headers, and a payload. Builders construct these without a
/// network; `runtime::execute` does the I/O.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Json(String),
    MultipartFormData { boundary: String, bytes: Vec<u8> },
}

impl Body {
    fn summary(&self) -> String {
        match self {
            Self::Json(s) => format!("Json(len={})", s.len()),
            Self::MultipartFormData { boundary, bytes } => {
                format!("MultipartFormData(boundary={boundary}, len={})", bytes.len())
            }
        }
    }
}

fn is_credential_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("authorization") || name.to_ascii_lowercase().contains("api-key")
}

impl std::fmt::Debug for HttpRequest {
    // Credentials must never leak through logs or panic messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                let v = if is_credential_header(k) {
                    "[REDACTED]"
                } else {
                    v.as_str()
                };
                (k.as_str(), v)
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body.summary())
            .finish()
    }
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(headers: Vec<(String, String)>) -> HttpRequest {
        HttpRequest {
            url: "https://example.com/v1/op".into(),
            headers,
            body: Body::Json("{}".into()),
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = request(vec![("Content-Type".into(), "application/json".into())]);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn debug_redacts_credential_headers() {
        let req = request(vec![
            ("Authorization".into(), "Bearer gsk-test-123".into()),
            ("xi-api-key".into(), "xi-456".into()),
            ("Content-Type".into(), "application/json".into()),
        ]);

        let s = format!("{req:?}");
        assert!(!s.contains("gsk-test-123"));
        assert!(!s.contains("xi-456"));
        assert!(!s.contains("Bearer"));
        assert!(s.contains("[REDACTED]"));
        assert!(s.contains("application/json"));
    }

    #[test]
    fn debug_summarizes_multipart_without_dumping_bytes() {
        let req = HttpRequest {
            url: "https://example.com/v1/op".into(),
            headers: vec![],
            body: Body::MultipartFormData {
                boundary: "b".into(),
                bytes: vec![0xAB; 512],
            },
        };
        let s = format!("{req:?}");
        assert!(s.contains("len=512"));
        assert!(!s.contains("171")); // 0xAB
    }

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(
            join_url("https://api.example.com/", "/chat/completions"),
            "https://api.example.com/chat/completions"
        );
        assert_eq!(
            join_url("https://api.example.com", "chat/completions"),
            "https://api.example.com/chat/completions"
        );
    }
}
