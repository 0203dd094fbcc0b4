use serde::Deserialize;
use serde::de::IgnoredAny;

/// Failure talking to the DATAHUB API.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { code: u16, message: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Failed to read response: {0}")]
    Body(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { code: 404, .. })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Items(Vec<DetailItem>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
struct DetailItem {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    #[serde(default)]
    msg: String,
}

impl DetailItem {
    fn describe(&self) -> String {
        let loc = self
            .loc
            .iter()
            .map(|part| match part {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" > ");
        if loc.is_empty() {
            self.msg.clone()
        } else {
            format!("{loc}: {}", self.msg)
        }
    }
}

/// Human-readable message for an error response body.
///
/// `detail` text is used verbatim, a `detail` list becomes
/// `loc > loc: msg` entries joined by `, `, then `message`, then the raw body.
pub(crate) fn error_message(code: u16, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
        match parsed.detail {
            Some(Detail::Text(text)) => return text,
            Some(Detail::Items(items)) if !items.is_empty() => {
                return items
                    .iter()
                    .map(DetailItem::describe)
                    .collect::<Vec<_>>()
                    .join(", ");
            }
            _ => {}
        }
        if let Some(message) = parsed.message {
            return message;
        }
    }
    if trimmed.is_empty() {
        format!("HTTP {code}")
    } else {
        format!("HTTP {code}: {trimmed}")
    }
}
