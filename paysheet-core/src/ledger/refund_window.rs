use time::OffsetDateTime;

use super::reconcile::format_date;
use crate::config::RefundPolicy;

/// The period after payment during which a refund may be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundWindow {
    paid_at: OffsetDateTime,
    until: Option<OffsetDateTime>,
}

impl RefundWindow {
    /// Window for a payment settled at `paid_at` (unix seconds).
    pub fn new(
        paid_at: i64,
        policy: &RefundPolicy,
    ) -> Result<Self, time::error::ComponentRange> {
        let paid_at = OffsetDateTime::from_unix_timestamp(paid_at)?;
        let until = policy
            .window()
            .and_then(|window| paid_at.checked_add(window));
        Ok(Self { paid_at, until })
    }

    /// Last moment a refund is accepted. Without a policy this is the
    /// payment time itself.
    pub fn refundable_until(&self) -> OffsetDateTime {
        self.until.unwrap_or(self.paid_at)
    }

    /// `YYYY-MM-DD` form stored on the Refunds tab.
    pub fn refundable_until_date(&self) -> String {
        format_date(self.refundable_until())
    }

    /// Whether `now` is still inside the window. Always closed without a policy.
    pub fn is_open(&self, now: OffsetDateTime) -> bool {
        self.until.is_some_and(|until| now <= until)
    }
}
