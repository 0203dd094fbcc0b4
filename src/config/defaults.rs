pub(super) const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub(super) const MAX_PAGE_SIZE: usize = 100;
pub(super) const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

pub(super) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(super) fn default_request_timeout_secs() -> u64 {
    30
}

pub(super) fn default_page_size() -> usize {
    crate::list_view::DEFAULT_PAGE_SIZE
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn clamp_page_size(value: usize) -> usize {
    value.clamp(1, MAX_PAGE_SIZE)
}

pub(super) fn clamp_request_timeout(value: u64) -> u64 {
    value.clamp(1, MAX_REQUEST_TIMEOUT_SECS)
}

/// Trim a base URL and drop trailing slashes; returns `None` when it does not parse
/// as an absolute http(s) URL.
pub(super) fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }
    Some(trimmed.to_string())
}
