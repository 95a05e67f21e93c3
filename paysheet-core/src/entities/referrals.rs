use kanau::processor::Processor;

use super::{find_row, flag_is_set};
use crate::framework::SheetProcessor;
use crate::sheets::{SheetError, SheetSpec};

sheet_record! {
    /// A referrer account. `commission` and `withdrawable` hold formulas
    /// summing the referral fees on the Purchases tab.
    pub struct ReferralRecord {
        referral_code,
        name,
        email,
        kind = "type",
        amount,
        active,
        commission,
        withdrawable,
    }
}

pub const REFERRALS: SheetSpec = SheetSpec {
    id: 2,
    title: "Referrals",
    headers: ReferralRecord::HEADERS,
    grid: None,
};

impl ReferralRecord {
    pub fn is_active(&self) -> bool {
        flag_is_set(&self.active)
    }
}

/// Total referral fees earned by the code in column A of `row`.
pub fn commission_formula(row: u32) -> String {
    format!("=SUMIF(Purchases!$P:$P,$A{row},Purchases!$Q:$Q)")
}

/// Referral fees whose payout date has already passed.
pub fn withdrawable_formula(row: u32) -> String {
    format!(
        "=SUMIFS(Purchases!$Q:$Q,Purchases!$P:$P,$A{row},Purchases!$O:$O,\"<\"&now())"
    )
}

#[derive(Debug, Clone)]
/// Find a referrer by code.
pub struct FindReferral {
    pub referral_code: String,
}

impl Processor<FindReferral> for SheetProcessor {
    type Output = Option<ReferralRecord>;
    type Error = SheetError;
    #[tracing::instrument(skip_all, err, name = "Sheet:FindReferral")]
    async fn process(&self, query: FindReferral) -> Result<Option<ReferralRecord>, SheetError> {
        let rows = self.sheets.rows(&REFERRALS).await?;
        Ok(find_row(&rows, "referral_code", &query.referral_code).map(ReferralRecord::from_row))
    }
}

#[derive(Debug, Clone)]
/// Append a referrer and install its commission formulas.
///
/// The formulas reference the row they live on, so they are written once
/// the row number is known.
pub struct InsertReferral {
    pub referral: ReferralRecord,
}

impl Processor<InsertReferral> for SheetProcessor {
    type Output = ReferralRecord;
    type Error = SheetError;
    #[tracing::instrument(skip_all, err, name = "Sheet:InsertReferral")]
    async fn process(&self, insert: InsertReferral) -> Result<ReferralRecord, SheetError> {
        self.sheets.ensure_sheet(&REFERRALS).await?;
        let mut referral = insert.referral;
        referral.commission.clear();
        referral.withdrawable.clear();
        referral.row = self
            .sheets
            .append_row(&REFERRALS, &referral.to_cells())
            .await?;

        referral.commission = commission_formula(referral.row);
        referral.withdrawable = withdrawable_formula(referral.row);
        self.sheets
            .update_cells(
                &REFERRALS,
                referral.row,
                &[
                    ("commission", referral.commission.clone()),
                    ("withdrawable", referral.withdrawable.clone()),
                ],
            )
            .await?;
        Ok(referral)
    }
}
