//! Back-office business rules.
//!
//! Everything here is pure: handlers load records, apply a rule, and save
//! the cells the rule changed.

pub mod commission;
pub mod fulfillment;
pub mod reconcile;
pub mod refund_window;

pub use commission::{CommissionScheme, ReferralOutcome};
pub use fulfillment::{FulfillmentError, ReceivedToggle};
pub use refund_window::RefundWindow;
