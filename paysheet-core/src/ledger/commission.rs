use paysheet_sdk::objects::referral::ReferralType;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::entities::referrals::ReferralRecord;

/// How much a referrer earns on one purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommissionScheme {
    /// Flat amount per purchase.
    Fixed(Decimal),
    /// Percentage of the purchase's net amount.
    Percent(Decimal),
}

impl CommissionScheme {
    /// Reads the scheme stored on a referral row.
    ///
    /// Only `fixed` selects a flat fee; any other type is a percentage.
    /// Returns `None` when the amount cell is not a number.
    pub fn from_referral(referral: &ReferralRecord) -> Option<Self> {
        let amount = parse_amount(&referral.amount)?;
        match ReferralType::parse(&referral.kind.trim().to_ascii_lowercase()) {
            Some(ReferralType::Fixed) => Some(CommissionScheme::Fixed(amount)),
            _ => Some(CommissionScheme::Percent(amount)),
        }
    }

    pub fn fee(&self, net_amount: Decimal) -> Decimal {
        match self {
            CommissionScheme::Fixed(amount) => *amount,
            CommissionScheme::Percent(rate) => {
                (net_amount * *rate / Decimal::ONE_HUNDRED).normalize()
            }
        }
    }
}

/// Parses an amount typed into the sheet, tolerating thousands separators.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

/// What verifying a payment does to the purchase's referral columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferralOutcome {
    /// Record this referral fee.
    Credit(Decimal),
    /// The referrer is inactive: clear the referral code.
    Revoke,
    /// No referrer has this code: leave the row as is.
    Unknown,
    /// The referrer's amount cell is unusable: leave the row as is.
    Invalid(String),
}

impl ReferralOutcome {
    pub fn resolve(referral: Option<&ReferralRecord>, net_amount: Decimal) -> Self {
        let Some(referral) = referral else {
            return ReferralOutcome::Unknown;
        };
        if !referral.is_active() {
            return ReferralOutcome::Revoke;
        }
        match CommissionScheme::from_referral(referral) {
            Some(scheme) => ReferralOutcome::Credit(scheme.fee(net_amount)),
            None => ReferralOutcome::Invalid(referral.amount.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn referral(kind: &str, amount: &str, active: &str) -> ReferralRecord {
        ReferralRecord {
            referral_code: "juan".into(),
            kind: kind.into(),
            amount: amount.into(),
            active: active.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fixed_fee_ignores_net_amount() {
        let scheme = CommissionScheme::from_referral(&referral("fixed", "50", "TRUE")).unwrap();
        assert_eq!(scheme, CommissionScheme::Fixed(d("50")));
        assert_eq!(scheme.fee(d("1450")), d("50"));
    }

    #[test]
    fn test_percent_fee() {
        let scheme = CommissionScheme::from_referral(&referral("percent", "10", "TRUE")).unwrap();
        assert_eq!(scheme.fee(d("1450")), d("145"));
        assert_eq!(scheme.fee(d("72.5")), d("7.25"));
        // Unrecognized types fall back to a percentage.
        let scheme = CommissionScheme::from_referral(&referral("bonus", "5", "TRUE")).unwrap();
        assert_eq!(scheme, CommissionScheme::Percent(d("5")));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 1,250.50 "), Some(d("1250.50")));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("ten"), None);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(ReferralOutcome::resolve(None, d("100")), ReferralOutcome::Unknown);
        assert_eq!(
            ReferralOutcome::resolve(Some(&referral("fixed", "20", "FALSE")), d("100")),
            ReferralOutcome::Revoke
        );
        assert_eq!(
            ReferralOutcome::resolve(Some(&referral("fixed", "20", "TRUE")), d("100")),
            ReferralOutcome::Credit(d("20"))
        );
        assert_eq!(
            ReferralOutcome::resolve(Some(&referral("percent", "n/a", "yes")), d("100")),
            ReferralOutcome::Invalid("n/a".into())
        );
    }
}
