use kanau::processor::Processor;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{find_row, flag_is_set};
use crate::framework::SheetProcessor;
use crate::sheets::{SheetError, SheetSpec};

sheet_record! {
    /// One order, keyed by the gateway reference number.
    pub struct PurchaseRecord {
        reference_no,
        deliverable,
        sent,
        courier,
        tracking_no,
        remarks,
        pm_link,
        payment_id,
        paid,
        date_paid,
        mop,
        currency,
        net_amount,
        fee,
        payout_date,
        referral_code,
        referral_fee,
        received,
        order_details,
        receiver_name,
        receiver_phone,
        notes,
        delivery_address,
        payer_name,
        payer_email,
        payer_phone,
        billing_address,
    }
}

pub const PURCHASES: SheetSpec = SheetSpec {
    id: 1,
    title: "Purchases",
    headers: PurchaseRecord::HEADERS,
    grid: Some((1000, 27)),
};

impl PurchaseRecord {
    /// Anything but an empty or `FALSE` cell ships physically.
    pub fn is_deliverable(&self) -> bool {
        let value = self.deliverable.trim();
        !(value.is_empty() || value.eq_ignore_ascii_case("false"))
    }

    pub fn is_paid(&self) -> bool {
        flag_is_set(&self.paid)
    }

    pub fn is_received(&self) -> bool {
        flag_is_set(&self.received)
    }

    pub fn is_sent(&self) -> bool {
        self.sent.trim().eq_ignore_ascii_case("yes")
    }

    pub fn is_done(&self) -> bool {
        self.remarks.trim().eq_ignore_ascii_case("done")
    }

    /// 1-based position among data rows, as reported to API callers.
    pub fn data_index(&self) -> u32 {
        self.row.saturating_sub(1)
    }
}

#[derive(Debug, Clone)]
/// Find a purchase by reference number.
pub struct FindPurchase {
    pub reference_no: String,
}

impl Processor<FindPurchase> for SheetProcessor {
    type Output = Option<PurchaseRecord>;
    type Error = SheetError;
    #[tracing::instrument(skip_all, err, name = "Sheet:FindPurchase")]
    async fn process(&self, query: FindPurchase) -> Result<Option<PurchaseRecord>, SheetError> {
        let rows = self.sheets.rows(&PURCHASES).await?;
        Ok(find_row(&rows, "reference_no", &query.reference_no).map(PurchaseRecord::from_row))
    }
}

#[derive(Debug, Clone)]
/// Append a new purchase, creating the tab if needed.
///
/// Returns the stored record with its row number filled in.
pub struct InsertPurchase {
    pub purchase: PurchaseRecord,
}

impl Processor<InsertPurchase> for SheetProcessor {
    type Output = PurchaseRecord;
    type Error = SheetError;
    #[tracing::instrument(skip_all, err, name = "Sheet:InsertPurchase")]
    async fn process(&self, insert: InsertPurchase) -> Result<PurchaseRecord, SheetError> {
        self.sheets.ensure_sheet(&PURCHASES).await?;
        let mut purchase = insert.purchase;
        purchase.row = self
            .sheets
            .append_row(&PURCHASES, &purchase.to_cells())
            .await?;
        Ok(purchase)
    }
}

#[derive(Debug, Clone)]
/// Write selected cells of a stored purchase.
///
/// Only the listed columns are touched, so concurrent edits to other
/// columns made directly on the sheet survive.
pub struct SavePurchase {
    pub row: u32,
    pub cells: Vec<(&'static str, String)>,
}

impl SavePurchase {
    /// Save every column of `purchase`.
    pub fn all(purchase: &PurchaseRecord) -> Self {
        Self {
            row: purchase.row,
            cells: purchase.to_cells(),
        }
    }
}

impl Processor<SavePurchase> for SheetProcessor {
    type Output = ();
    type Error = SheetError;
    #[tracing::instrument(skip_all, err, name = "Sheet:SavePurchase", fields(row = save.row))]
    async fn process(&self, save: SavePurchase) -> Result<(), SheetError> {
        self.sheets
            .update_cells(&PURCHASES, save.row, &save.cells)
            .await
    }
}

#[derive(Debug, Clone)]
/// Referral fees of every purchase made with a referral code, in sheet order.
///
/// One entry per purchase. Fees not yet computed come back as empty strings;
/// unparsable ones are kept verbatim.
pub struct ListReferralFees {
    pub referral_code: String,
}

impl Processor<ListReferralFees> for SheetProcessor {
    type Output = Vec<String>;
    type Error = SheetError;
    #[tracing::instrument(skip_all, err, name = "Sheet:ListReferralFees")]
    async fn process(&self, query: ListReferralFees) -> Result<Vec<String>, SheetError> {
        let rows = self.sheets.rows(&PURCHASES).await?;
        Ok(rows
            .iter()
            .filter(|row| row.get("referral_code") == query.referral_code)
            .map(|row| row.get("referral_fee").trim())
            .map(|fee| match Decimal::from_str(fee) {
                Ok(fee) => fee.normalize().to_string(),
                Err(_) => fee.to_owned(),
            })
            .collect())
    }
}
