use std::sync::Arc;

use crate::sheets::SheetStore;

/// Runs sheet queries. Every entity query is a [`kanau::processor::Processor`]
/// implemented on this type.
#[derive(Clone)]
pub struct SheetProcessor {
    pub sheets: Arc<dyn SheetStore>,
}

impl SheetProcessor {
    pub fn new(sheets: Arc<dyn SheetStore>) -> Self {
        Self { sheets }
    }
}
