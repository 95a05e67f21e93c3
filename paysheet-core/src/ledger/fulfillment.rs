//! Delivery and receipt rules for purchases.

use thiserror::Error;

use crate::entities::purchases::PurchaseRecord;
use crate::entities::{checkbox, yes_no};

/// A fulfillment change refused because of the purchase's state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FulfillmentError {
    #[error("Order is Not Considered as *Deliverable*")]
    NotDeliverable,

    #[error("Order Not Yet Delivered")]
    NotYetSent,

    #[error("Oops!Request Failed. We Already Marked This Transaction as DONE")]
    AlreadyDone,

    #[error("Opps! Cant Updated Delivery Address, The Type of Purchase was Non-Deliverable!")]
    AddressNotDeliverable,

    #[error("Oops! Cant Update Delivery Address, Product Purchase was Already Received!")]
    AddressAlreadyReceived,
}

/// Shipment details of a purchase that has been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracking {
    pub tracking_no: String,
    pub courier: String,
    pub sent: String,
}

pub fn tracking(purchase: &PurchaseRecord) -> Result<Tracking, FulfillmentError> {
    if !purchase.is_deliverable() {
        return Err(FulfillmentError::NotDeliverable);
    }
    if !purchase.is_sent() {
        return Err(FulfillmentError::NotYetSent);
    }
    Ok(Tracking {
        tracking_no: purchase.tracking_no.clone(),
        courier: purchase.courier.clone(),
        sent: purchase.sent.clone(),
    })
}

/// Result of toggling a purchase's `received` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceivedToggle {
    /// Done transaction that had not been marked received yet.
    DoneAndReceived,
    Marked,
    Unmarked,
}

impl ReceivedToggle {
    pub fn message(&self) -> &'static str {
        match self {
            ReceivedToggle::DoneAndReceived => "Transaction is DONE Already and marked as Received!",
            ReceivedToggle::Marked => "Order Marked As Received!",
            ReceivedToggle::Unmarked => "Order Unmarked as Received!",
        }
    }
}

/// Flips `received`. A done transaction can only move to received.
///
/// The done-specific message is only used when `received` explicitly reads
/// `no`; a done purchase with a blank cell is marked like any other.
pub fn toggle_received(purchase: &mut PurchaseRecord) -> Result<ReceivedToggle, FulfillmentError> {
    let received = purchase.is_received();
    let explicitly_unreceived = purchase.received.trim().eq_ignore_ascii_case("no");
    let toggle = match (purchase.is_done(), received) {
        (true, true) => return Err(FulfillmentError::AlreadyDone),
        (true, false) if explicitly_unreceived => ReceivedToggle::DoneAndReceived,
        (_, false) => ReceivedToggle::Marked,
        (false, true) => ReceivedToggle::Unmarked,
    };
    purchase.received = yes_no(!received).to_owned();
    Ok(toggle)
}

/// New delivery details for a purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryAddress {
    pub receiver_name: String,
    pub receiver_phone: String,
    pub address: String,
    pub notes: String,
}

/// Columns written by [`update_address`].
pub const ADDRESS_COLUMNS: &[&str] = &[
    "deliverable",
    "receiver_name",
    "receiver_phone",
    "notes",
    "delivery_address",
];

/// Replaces the delivery details of a deliverable purchase that has not
/// been received yet.
pub fn update_address(
    purchase: &mut PurchaseRecord,
    delivery: DeliveryAddress,
) -> Result<(), FulfillmentError> {
    if !purchase.is_deliverable() {
        return Err(FulfillmentError::AddressNotDeliverable);
    }
    if purchase.is_received() {
        return Err(FulfillmentError::AddressAlreadyReceived);
    }
    purchase.receiver_name = delivery.receiver_name;
    purchase.receiver_phone = delivery.receiver_phone;
    purchase.delivery_address = delivery.address;
    purchase.notes = delivery.notes;
    purchase.deliverable = checkbox(true).to_owned();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(deliverable: &str, sent: &str, remarks: &str, received: &str) -> PurchaseRecord {
        PurchaseRecord {
            row: 2,
            reference_no: "ref_1".into(),
            deliverable: deliverable.into(),
            sent: sent.into(),
            courier: "LBC".into(),
            tracking_no: "LBC123".into(),
            remarks: remarks.into(),
            received: received.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tracking() {
        assert_eq!(
            tracking(&purchase("FALSE", "N/A", "", "")),
            Err(FulfillmentError::NotDeliverable)
        );
        assert_eq!(
            tracking(&purchase("", "yes", "", "")),
            Err(FulfillmentError::NotDeliverable)
        );
        assert_eq!(
            tracking(&purchase("TRUE", "", "", "")),
            Err(FulfillmentError::NotYetSent)
        );
        let sent = tracking(&purchase("TRUE", "Yes", "", "")).unwrap();
        assert_eq!(sent.tracking_no, "LBC123");
        assert_eq!(sent.courier, "LBC");
        assert_eq!(sent.sent, "Yes");
    }

    #[test]
    fn test_toggle_received() {
        let mut record = purchase("TRUE", "yes", "", "");
        assert_eq!(toggle_received(&mut record), Ok(ReceivedToggle::Marked));
        assert_eq!(record.received, "yes");
        assert_eq!(toggle_received(&mut record), Ok(ReceivedToggle::Unmarked));
        assert_eq!(record.received, "no");

        let mut done = purchase("TRUE", "yes", "DONE", "no");
        assert_eq!(toggle_received(&mut done), Ok(ReceivedToggle::DoneAndReceived));
        assert_eq!(done.received, "yes");
        assert_eq!(toggle_received(&mut done), Err(FulfillmentError::AlreadyDone));
        assert_eq!(done.received, "yes");
    }

    #[test]
    fn test_toggle_done_with_blank_received() {
        let mut done = purchase("TRUE", "yes", "DONE", "");
        assert_eq!(toggle_received(&mut done), Ok(ReceivedToggle::Marked));
        assert_eq!(done.received, "yes");
        assert_eq!(toggle_received(&mut done), Err(FulfillmentError::AlreadyDone));
    }

    #[test]
    fn test_update_address() {
        let delivery = DeliveryAddress {
            receiver_name: "Maria".into(),
            receiver_phone: "0918".into(),
            address: "5 Mabini St".into(),
            notes: "gate code 12".into(),
        };

        let mut digital = purchase("FALSE", "N/A", "", "");
        assert_eq!(
            update_address(&mut digital, delivery.clone()),
            Err(FulfillmentError::AddressNotDeliverable)
        );

        let mut received = purchase("TRUE", "yes", "", "yes");
        assert_eq!(
            update_address(&mut received, delivery.clone()),
            Err(FulfillmentError::AddressAlreadyReceived)
        );

        let mut open = purchase("yes", "", "", "no");
        update_address(&mut open, delivery).unwrap();
        assert_eq!(open.delivery_address, "5 Mabini St");
        assert_eq!(open.receiver_name, "Maria");
        assert_eq!(open.notes, "gate code 12");
        assert_eq!(open.deliverable, "TRUE");
    }
}
