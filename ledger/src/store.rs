use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::models::batch_attendance::BatchAttendance;

/// In-memory ledger: one independently lockable aggregate per batch.
///
/// Reconciliation must hold the batch mutex across its entire
/// find-or-create-and-mutate sequence; two scans that both observe "no
/// record" and both insert would otherwise duplicate a day. No cross-batch
/// coordination exists.
#[derive(Debug, Default)]
pub struct LedgerStore {
    batches: RwLock<HashMap<String, Arc<Mutex<BatchAttendance>>>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get-or-create the aggregate for a batch.
    pub fn batch(&self, batch_id: &str) -> Arc<Mutex<BatchAttendance>> {
        if let Some(found) = self
            .batches
            .read()
            .expect("ledger map lock poisoned")
            .get(batch_id)
        {
            return Arc::clone(found);
        }
        let mut map = self.batches.write().expect("ledger map lock poisoned");
        Arc::clone(
            map.entry(batch_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(BatchAttendance::new(batch_id)))),
        )
    }

    /// Read-only lookup; `None` when no event has ever touched the batch.
    pub fn get(&self, batch_id: &str) -> Option<Arc<Mutex<BatchAttendance>>> {
        self.batches
            .read()
            .expect("ledger map lock poisoned")
            .get(batch_id)
            .map(Arc::clone)
    }
}
