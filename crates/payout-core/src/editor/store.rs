use crate::commission::PayoutRecord;
use crate::PayoutResult;

/// Persistence seam. Called on explicit submit only, never per recompute.
pub trait PayoutStore {
    fn save(&mut self, record: &PayoutRecord) -> PayoutResult<()>;
}

/// Keeps every submitted snapshot in order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Vec<PayoutRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> &[PayoutRecord] {
        &self.saved
    }

    /// Most recent snapshot saved under `id`.
    pub fn latest(&self, id: &str) -> Option<&PayoutRecord> {
        self.saved
            .iter()
            .rev()
            .find(|r| r.id.as_deref() == Some(id))
    }
}

impl PayoutStore for MemoryStore {
    fn save(&mut self, record: &PayoutRecord) -> PayoutResult<()> {
        self.saved.push(record.clone());
        Ok(())
    }
}
