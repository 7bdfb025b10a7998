/// Status and body of a completed HTTP exchange, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawHttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response without a body, mostly useful for error statuses.
    pub fn status_only(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}
