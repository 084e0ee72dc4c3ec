//! Pure types for request-scoped context.

use uuid::Uuid;

/// Correlation id of a request, as carried in `X-Request-ID`.
///
/// Inbound ids are echoed verbatim, so this is not restricted to UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request-scoped values available to every handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
}
