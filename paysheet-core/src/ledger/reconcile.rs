//! Copying a settled payment onto its purchase row.

use rust_decimal::Decimal;
use time::OffsetDateTime;

use super::commission::ReferralOutcome;
use crate::entities::purchases::PurchaseRecord;
use crate::entities::yes_no;
use crate::gateway::{BillingAddress, GatewayPayment, Transaction};

/// `YYYY-MM-DD` in UTC.
pub fn format_date(at: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        at.year(),
        u8::from(at.month()),
        at.day()
    )
}

/// [`format_date`] for a unix timestamp; empty when out of range.
pub fn format_unix_date(unix: i64) -> String {
    OffsetDateTime::from_unix_timestamp(unix)
        .map(format_date)
        .unwrap_or_default()
}

/// Gateway amounts are integer centavos.
pub fn centavos(amount: i64) -> Decimal {
    Decimal::new(amount, 2).normalize()
}

pub fn billing_address(address: &BillingAddress) -> String {
    format!(
        "{} {},{} {} {}, {}",
        address.line1,
        address.line2,
        address.city,
        address.state,
        address.postal_code,
        address.country
    )
}

/// Columns written when a payment is verified.
pub const PAYMENT_COLUMNS: &[&str] = &[
    "paid",
    "pm_link",
    "date_paid",
    "payment_id",
    "payout_date",
    "currency",
    "net_amount",
    "fee",
    "mop",
    "order_details",
    "payer_name",
    "payer_email",
    "payer_phone",
    "billing_address",
];

/// Marks `purchase` paid and copies the payment's details onto it.
pub fn apply_payment(
    purchase: &mut PurchaseRecord,
    transaction: &Transaction,
    payment: &GatewayPayment,
) {
    purchase.paid = yes_no(true).to_owned();
    purchase.pm_link = transaction.attributes.url.clone();
    purchase.date_paid = format_unix_date(payment.paid_at);
    purchase.payment_id = payment.id.clone();
    purchase.payout_date = format_unix_date(payment.available_at);
    purchase.currency = payment.currency.clone();
    purchase.net_amount = centavos(payment.net_amount).to_string();
    purchase.fee = centavos(payment.fee).to_string();
    purchase.mop = payment.mop_text.clone();
    purchase.order_details = payment.description.clone();
    purchase.payer_name = payment.billing.name.clone();
    purchase.payer_email = payment.billing.email.clone();
    purchase.payer_phone = payment.billing.phone.clone();
    purchase.billing_address = billing_address(&payment.billing.address);
}

/// Applies the referral outcome. Returns the columns it changed.
pub fn apply_referral(purchase: &mut PurchaseRecord, outcome: &ReferralOutcome) -> &'static [&'static str] {
    match outcome {
        ReferralOutcome::Credit(fee) => {
            purchase.referral_fee = fee.to_string();
            &["referral_fee"]
        }
        ReferralOutcome::Revoke => {
            purchase.referral_code.clear();
            &["referral_code"]
        }
        ReferralOutcome::Unknown | ReferralOutcome::Invalid(_) => &[],
    }
}

/// The purchase cells named by `columns`, for a partial save.
pub fn select_cells(purchase: &PurchaseRecord, columns: &[&str]) -> Vec<(&'static str, String)> {
    purchase
        .to_cells()
        .into_iter()
        .filter(|(name, _)| columns.contains(name))
        .collect()
}
