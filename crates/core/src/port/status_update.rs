// Status write shared by the entity store ports

/// New status plus ancillary fields written by a single or bulk conditional update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate<S> {
    pub status: S,
    /// Stored as the failure or decline reason, depending on the target status
    pub reason: Option<String>,
    pub updated_at: i64,
}

impl<S> StatusUpdate<S> {
    pub fn new(status: S, updated_at: i64) -> Self {
        Self {
            status,
            reason: None,
            updated_at,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
