use kanau::processor::Processor;

use super::find_row;
use crate::framework::SheetProcessor;
use crate::sheets::{SheetError, SheetSpec};

sheet_record! {
    /// A refund request against a paid purchase.
    pub struct RefundRecord {
        reference_no,
        payment_id,
        currency,
        amount,
        refundable_until,
        kind = "type",
        mail_sent,
        message,
        email,
        phone,
        mop,
        mop_details,
        approved,
        remarks,
    }
}

pub const REFUNDS: SheetSpec = SheetSpec {
    id: 3,
    title: "Refunds",
    headers: RefundRecord::HEADERS,
    grid: None,
};

#[derive(Debug, Clone)]
/// Find a refund request by purchase reference number.
pub struct FindRefund {
    pub reference_no: String,
}

impl Processor<FindRefund> for SheetProcessor {
    type Output = Option<RefundRecord>;
    type Error = SheetError;
    #[tracing::instrument(skip_all, err, name = "Sheet:FindRefund")]
    async fn process(&self, query: FindRefund) -> Result<Option<RefundRecord>, SheetError> {
        let rows = self.sheets.rows(&REFUNDS).await?;
        Ok(find_row(&rows, "reference_no", &query.reference_no).map(RefundRecord::from_row))
    }
}

#[derive(Debug, Clone)]
/// Append a refund request, creating the tab if needed.
pub struct InsertRefund {
    pub refund: RefundRecord,
}

impl Processor<InsertRefund> for SheetProcessor {
    type Output = RefundRecord;
    type Error = SheetError;
    #[tracing::instrument(skip_all, err, name = "Sheet:InsertRefund")]
    async fn process(&self, insert: InsertRefund) -> Result<RefundRecord, SheetError> {
        self.sheets.ensure_sheet(&REFUNDS).await?;
        let mut refund = insert.refund;
        refund.row = self.sheets.append_row(&REFUNDS, &refund.to_cells()).await?;
        Ok(refund)
    }
}
