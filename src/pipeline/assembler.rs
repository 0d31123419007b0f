//! Result assembly
//!
//! Page-indexed result slots shared by both phases. Each slot is written at
//! most once; unwritten slots come out empty.

use super::types::PageResult;

/// Write-once result slots, one per page
#[derive(Debug)]
pub struct PageResults {
    slots: Vec<Option<PageResult>>,
}

impl PageResults {
    pub fn new(page_count: usize) -> Self {
        Self {
            slots: vec![None; page_count],
        }
    }

    pub fn page_count(&self) -> usize {
        self.slots.len()
    }

    /// Store a page's final result
    ///
    /// Returns `false` (and leaves the slot untouched) when the page is out of
    /// range or already recorded.
    pub fn record(&mut self, result: PageResult) -> bool {
        let page = result.index;
        let Some(slot) = page.checked_sub(1).and_then(|i| self.slots.get_mut(i)) else {
            tracing::warn!(
                "Dropping result for page {} (document has {} pages)",
                page,
                self.slots.len()
            );
            return false;
        };

        if slot.is_some() {
            tracing::warn!("Page {} already has a result, keeping the first", page);
            return false;
        }

        *slot = Some(result);
        true
    }

    pub fn is_recorded(&self, page: usize) -> bool {
        page.checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .is_some_and(Option::is_some)
    }

    /// Results in page order, with unrecorded pages as empty
    pub fn finish(self) -> Vec<PageResult> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.unwrap_or_else(|| PageResult::empty(i + 1)))
            .collect()
    }
}
