//! Spreadsheet connection configuration.

/// Google spreadsheet and the service account allowed to edit it.
#[derive(Clone)]
pub struct SheetsConfig {
    /// The id segment of the spreadsheet URL.
    pub spreadsheet_id: String,
    pub service_account_email: String,
    /// PEM-encoded PKCS#8 private key of the service account.
    pub private_key: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("service_account_email", &self.service_account_email)
            .finish_non_exhaustive()
    }
}
