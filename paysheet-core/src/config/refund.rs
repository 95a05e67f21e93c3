//! Refund policy.

/// How long after payment a refund may be requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefundPolicy {
    /// Window length in hours; `None` disables the window.
    pub window_hours: Option<u32>,
}

impl RefundPolicy {
    pub fn window(&self) -> Option<time::Duration> {
        self.window_hours
            .map(|hours| time::Duration::hours(i64::from(hours)))
    }
}
