//! Gateway wire types.
//!
//! Every gateway payload is wrapped as `{"data": {"id": ..., "attributes": {...}}}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource<A> {
    #[serde(default)]
    pub id: String,
    pub attributes: A,
}

/// Body of `POST /auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Attributes of an issued API token. The token itself is the resource id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttributes {
    /// Seconds until the token expires.
    #[serde(default)]
    pub expiry_timer: i64,
}

/// An issued API token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken {
    pub token: String,
    pub expiry_timer: i64,
}

/// Attributes sent when creating a payment link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttributes {
    pub amount: i64,
    pub description: String,
    pub livemode: bool,
    pub remarks: String,
}

/// Lifecycle status of a transaction (payment link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Unpaid,
    Paid,
    #[serde(other)]
    Other,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Unpaid => "unpaid",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAttributes {
    pub status: TransactionStatus,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub payments: Vec<GatewayPayment>,
}

/// A transaction as returned by the gateway; `id` is the reference number.
pub type Transaction = Resource<TransactionAttributes>;

impl Transaction {
    /// The first settled payment, if any.
    pub fn paid_payment(&self) -> Option<&GatewayPayment> {
        self.attributes.payments.iter().find(|p| p.status == "paid")
    }
}

/// A payment attempt against a transaction.
///
/// Amounts are in centavos; timestamps are unix seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPayment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub net_amount: i64,
    #[serde(default)]
    pub fee: i64,
    #[serde(default)]
    pub mop_text: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub paid_at: i64,
    #[serde(default)]
    pub available_at: i64,
    #[serde(default)]
    pub billing: Billing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Billing {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: BillingAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_parsing() {
        let json = r#"{
            "data": {
                "id": "ref_123",
                "attributes": {
                    "status": "paid",
                    "url": "https://pay.example.com/ref_123",
                    "amount": 150000,
                    "payments": [
                        {"id": "pay_1", "status": "failed"},
                        {
                            "id": "pay_2",
                            "status": "paid",
                            "currency": "PHP",
                            "net_amount": 145000,
                            "fee": 5000,
                            "mop_text": "GCash",
                            "paid_at": 1700000000,
                            "available_at": 1700600000,
                            "billing": {"name": "Juan", "address": {"city": "Manila"}}
                        }
                    ]
                }
            }
        }"#;
        let envelope: Envelope<Transaction> = serde_json::from_str(json).unwrap();
        let transaction = envelope.data;
        assert_eq!(transaction.id, "ref_123");
        assert_eq!(transaction.attributes.status, TransactionStatus::Paid);
        let payment = transaction.paid_payment().unwrap();
        assert_eq!(payment.id, "pay_2");
        assert_eq!(payment.billing.address.city, "Manila");
        assert_eq!(payment.billing.address.country, "");
    }

    #[test]
    fn test_unknown_status_tolerated() {
        let json = r#"{"status": "refunded"}"#;
        let attributes: TransactionAttributes = serde_json::from_str(json).unwrap();
        assert_eq!(attributes.status, TransactionStatus::Other);
        assert!(attributes.payments.is_empty());
    }
}
