//! In-process [`SheetStore`] for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Cells, SheetError, SheetRow, SheetSpec, SheetStore};

#[derive(Debug, Default)]
struct Tab {
    headers: Vec<String>,
    /// Data rows; index 0 is sheet row 2.
    rows: Vec<Vec<String>>,
}

/// A spreadsheet held in memory.
///
/// Formulas are stored verbatim, not evaluated.
#[derive(Debug, Default)]
pub struct MemorySheets {
    tabs: RwLock<HashMap<u32, Tab>>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a cell, for assertions.
    pub async fn cell(&self, sheet: u32, row: u32, header: &str) -> Option<String> {
        let tabs = self.tabs.read().await;
        let tab = tabs.get(&sheet)?;
        let column = tab.headers.iter().position(|h| h == header)?;
        let index = (row as usize).checked_sub(2)?;
        tab.rows.get(index)?.get(column).cloned()
    }

    pub async fn row_count(&self, sheet: u32) -> usize {
        self.tabs
            .read()
            .await
            .get(&sheet)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl SheetStore for MemorySheets {
    async fn ensure_sheet(&self, spec: &SheetSpec) -> Result<(), SheetError> {
        let mut tabs = self.tabs.write().await;
        let tab = tabs.entry(spec.id).or_default();
        if tab.headers.is_empty() {
            tab.headers = spec.headers.iter().map(|h| h.to_string()).collect();
        }
        Ok(())
    }

    async fn rows(&self, spec: &SheetSpec) -> Result<Vec<SheetRow>, SheetError> {
        let tabs = self.tabs.read().await;
        let Some(tab) = tabs.get(&spec.id) else {
            return Ok(Vec::new());
        };
        Ok(tab
            .rows
            .iter()
            .enumerate()
            .map(|(i, values)| SheetRow::from_values(i as u32 + 2, &tab.headers, values.clone()))
            .collect())
    }

    async fn append_row(&self, spec: &SheetSpec, cells: &Cells) -> Result<u32, SheetError> {
        let mut tabs = self.tabs.write().await;
        let tab = tabs
            .get_mut(&spec.id)
            .ok_or(SheetError::MissingSheet(spec.id))?;
        let row = tab
            .headers
            .iter()
            .map(|h| {
                cells
                    .iter()
                    .find(|(name, _)| name == h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        tab.rows.push(row);
        Ok(tab.rows.len() as u32 + 1)
    }

    async fn update_cells(
        &self,
        spec: &SheetSpec,
        row: u32,
        cells: &Cells,
    ) -> Result<(), SheetError> {
        let mut tabs = self.tabs.write().await;
        let tab = tabs
            .get_mut(&spec.id)
            .ok_or(SheetError::MissingSheet(spec.id))?;
        let width = tab.headers.len();
        let values = (row as usize)
            .checked_sub(2)
            .and_then(|i| tab.rows.get_mut(i))
            .ok_or_else(|| SheetError::Parse(format!("row {row} out of range")))?;
        values.resize(width, String::new());
        for (name, value) in cells {
            if let Some(column) = tab.headers.iter().position(|h| h == name) {
                values[column] = value.clone();
            }
        }
        Ok(())
    }
}
