use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    Timeout,
    ConnectionFailed(String),
    DnsResolution(String),
    ProxyError(String),
    RateLimited,
    HttpStatus(u16),
    TlsError(String),
    Decode(String),
    InvalidAirport(String),
    InvalidDate(String),
    Validation(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(
                f,
                "request timed out — the flights backend may be slow or unreachable. \
                 Try increasing --timeout or check your connection"
            ),
            Self::ConnectionFailed(detail) => write!(
                f,
                "connection failed — check that the backend is running and \
                 --base-url points at it ({detail})"
            ),
            Self::DnsResolution(host) => write!(
                f,
                "DNS resolution failed for {host} — check your --base-url and connection"
            ),
            Self::ProxyError(detail) => write!(
                f,
                "proxy error — check your --proxy URL is correct ({detail})"
            ),
            Self::RateLimited => write!(
                f,
                "rate limited by the flights backend (HTTP 429) — wait a moment before retrying"
            ),
            Self::HttpStatus(status) => write!(
                f,
                "unexpected HTTP status {status} from the flights backend"
            ),
            Self::TlsError(detail) => write!(
                f,
                "TLS/SSL error — connection to the backend failed ({detail})"
            ),
            Self::Decode(detail) => write!(
                f,
                "failed to decode the backend response — {detail}. \
                 This may indicate a backend schema change"
            ),
            Self::InvalidAirport(code) => write!(
                f,
                "invalid airport code \"{code}\" — must be exactly 4 letters (e.g. KJFK, EGLL, EFHK)"
            ),
            Self::InvalidDate(date) => write!(
                f,
                "invalid date \"{date}\" — must be YYYY-MM-DD format (e.g. 2026-03-01)"
            ),
            Self::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

pub fn from_http_error(err: wreq::Error) -> ApiError {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if err.is_timeout() {
        return ApiError::Timeout;
    }

    if err.is_connect() {
        if lower.contains("dns") || lower.contains("resolve") || lower.contains("getaddrinfo") {
            return ApiError::DnsResolution(msg);
        }
        return ApiError::ConnectionFailed(msg);
    }

    if lower.contains("proxy") || lower.contains("socks") {
        return ApiError::ProxyError(msg);
    }

    if lower.contains("tls") || lower.contains("ssl") || lower.contains("certificate") {
        return ApiError::TlsError(msg);
    }

    if lower.contains("builder error") && lower.contains("uri") {
        return ApiError::ProxyError(msg);
    }

    ApiError::ConnectionFailed(msg)
}
