//! In-memory progress store for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{ProgressTable, QuestionRecord, RecordIdentity};
use crate::traits::{AddOutcome, ProgressStore};

/// A progress store kept in process memory.
///
/// Can be switched into a failing mode to exercise the engine's handling of
/// an unreachable store.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<ProgressTable, Vec<QuestionRecord>>>,
    failing: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rows.
    pub fn with_rows(table: ProgressTable, rows: Vec<QuestionRecord>) -> Self {
        let store = Self::default();
        store.lock_tables().insert(table, rows);
        store
    }

    /// Make every later call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap_or_else(|e| e.into_inner()) = failing;
    }

    /// Snapshot of a table.
    pub fn rows(&self, table: ProgressTable) -> Vec<QuestionRecord> {
        self.lock_tables().get(&table).cloned().unwrap_or_default()
    }

    fn lock_tables(&self) -> std::sync::MutexGuard<'_, HashMap<ProgressTable, Vec<QuestionRecord>>> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self) -> Result<(), StoreError> {
        if *self.failing.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StoreError::Network("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self, table: ProgressTable) -> Result<Vec<QuestionRecord>, StoreError> {
        self.check()?;
        Ok(self.rows(table))
    }

    async fn add(
        &self,
        table: ProgressTable,
        record: &QuestionRecord,
    ) -> Result<AddOutcome, StoreError> {
        self.check()?;
        let mut tables = self.lock_tables();
        let rows = tables.entry(table).or_default();
        let identity = record.identity();
        if rows.iter().any(|r| r.identity() == identity) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        rows.push(record.clone());
        Ok(AddOutcome::Inserted)
    }

    async fn remove(
        &self,
        table: ProgressTable,
        identity: &RecordIdentity,
    ) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.lock_tables();
        let Some(rows) = tables.get_mut(&table) else {
            return Ok(false);
        };
        match rows.iter().position(|r| &r.identity() == identity) {
            Some(idx) => {
                rows.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_is_unique_per_identity() {
        let store = MemoryStore::new();
        let q = QuestionRecord::new("A", "B", "C", "hello", "안녕");
        let padded = QuestionRecord {
            eng: " hello ".into(),
            ..q.clone()
        };

        assert_eq!(
            store.add(ProgressTable::Incorrect, &q).await.unwrap(),
            AddOutcome::Inserted
        );
        assert_eq!(
            store.add(ProgressTable::Incorrect, &padded).await.unwrap(),
            AddOutcome::AlreadyPresent
        );
        assert_eq!(store.rows(ProgressTable::Incorrect).len(), 1);
        assert!(store.rows(ProgressTable::Mastered).is_empty());
    }

    #[tokio::test]
    async fn remove_reports_whether_a_row_matched() {
        let q = QuestionRecord::new("A", "B", "C", "hello", "안녕");
        let store = MemoryStore::with_rows(ProgressTable::Mastered, vec![q.clone()]);

        assert!(store
            .remove(ProgressTable::Mastered, &q.identity())
            .await
            .unwrap());
        assert!(!store
            .remove(ProgressTable::Mastered, &q.identity())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn failing_mode() {
        let store = MemoryStore::new();
        store.set_failing(true);
        assert!(store.list(ProgressTable::Incorrect).await.is_err());
        store.set_failing(false);
        assert!(store.list(ProgressTable::Incorrect).await.is_ok());
    }
}
