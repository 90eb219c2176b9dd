//! Network-level error taxonomy shared by every outbound HTTP call

/// Failure to obtain an HTTP response at all.
///
/// A response with a non-success status is *not* a `FetchError`: callers get
/// the status back in [`HttpResponse`](crate::HttpResponse) and decide for
/// themselves. Everything but [`FetchError::Request`] is transport trouble.
#[derive(Debug)]
pub enum FetchError {
    /// Request or body read exceeded the per-request timeout
    Timeout(String),
    /// Could not establish a connection
    Connect(String),
    /// Connection dropped while reading the response body
    Body(String),
    /// The request could not be built (invalid URL, bad header); never sent
    Request(String),
    /// Anything else reqwest reports (redirect loops, ...)
    Other(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout(m) => write!(f, "timeout: {m}"),
            Self::Connect(m) => write!(f, "connection error: {m}"),
            Self::Body(m) => write!(f, "body read error: {m}"),
            Self::Request(m) => write!(f, "invalid request: {m}"),
            Self::Other(m) => write!(f, "request error: {m}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl FetchError {
    /// Classify a reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        let message = e.to_string();
        if e.is_timeout() {
            Self::Timeout(message)
        } else if e.is_connect() {
            Self::Connect(message)
        } else if e.is_body() || e.is_decode() {
            Self::Body(message)
        } else if e.is_builder() {
            Self::Request(message)
        } else {
            Self::Other(message)
        }
    }

    /// Whether another attempt could succeed. An unbuildable request fails
    /// the same way every time.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Request(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::from_reqwest(&e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_timeout() {
        let err = FetchError::Timeout("operation timed out".to_string());
        assert_eq!(format!("{err}"), "timeout: operation timed out");
        assert!(err.is_retryable());
    }

    #[test]
    fn display_connect() {
        let err = FetchError::Connect("refused".to_string());
        assert_eq!(format!("{err}"), "connection error: refused");
        assert!(err.is_retryable());
    }

    #[test]
    fn display_body_and_other() {
        assert!(format!("{}", FetchError::Body("eof".into())).starts_with("body read error"));
        assert!(format!("{}", FetchError::Other("bad".into())).starts_with("request error"));
    }

    #[test]
    fn unbuildable_request_is_not_retryable() {
        let err = FetchError::Request("relative URL without a base".into());
        assert!(!err.is_retryable());
        assert!(format!("{err}").starts_with("invalid request"));
    }

    #[test]
    fn invalid_url_classifies_as_request() {
        let err = crate::get("not a url", std::time::Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, FetchError::Request(_)), "got {err:?}");
    }
}
