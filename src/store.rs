use crate::errors::DiaryError;
use crate::models::{ChartPoint, Record, RecordInput};
use crate::storage::{self, KeyValueStore, AVATAR_KEY};
use crate::views;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Emitted to subscribers after a mutation has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    RecordAdded(Record),
    RecordDeleted(Record),
    AvatarChanged,
}

type Listener = Box<dyn Fn(&Change) + Send + Sync>;

/// Diary records plus the pet's avatar, written through to a key-value
/// backend on every mutation.
pub struct DiaryStore {
    backend: Arc<dyn KeyValueStore>,
    records: Vec<Record>,
    avatar: String,
    listeners: Vec<Listener>,
}

impl DiaryStore {
    /// Loads both blobs from `backend`. Unreadable data starts an empty
    /// diary rather than failing.
    pub fn open(backend: Arc<dyn KeyValueStore>) -> Self {
        let records = dedupe_dates(storage::load_records(backend.as_ref()));
        let avatar = storage::load_avatar(backend.as_ref());
        Self {
            backend,
            records,
            avatar,
            listeners: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Change) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add(&mut self, candidate: RecordInput) -> Result<Record, DiaryError> {
        self.add_at(candidate, Utc::now())
    }

    /// Only live records take part in the date check, so a date freed by a
    /// delete can be logged again.
    pub fn add_at(&mut self, candidate: RecordInput, now: DateTime<Utc>) -> Result<Record, DiaryError> {
        if self.records.iter().any(|record| record.date == candidate.date) {
            return Err(DiaryError::DuplicateDate(candidate.date));
        }
        if let Some(field) = candidate.negative_field() {
            return Err(DiaryError::NegativeValue { field });
        }

        let record = Record::from_input(self.next_id(now.timestamp_millis()), candidate);
        self.records.push(record.clone());
        if let Err(err) = storage::persist_records(self.backend.as_ref(), &self.records) {
            self.records.pop();
            return Err(err);
        }

        self.notify(&Change::RecordAdded(record.clone()));
        Ok(record)
    }

    /// Returns `false` without touching storage when no record has `id`.
    pub fn delete(&mut self, id: i64) -> Result<bool, DiaryError> {
        let Some(position) = self.records.iter().position(|record| record.id == id) else {
            return Ok(false);
        };

        let removed = self.records.remove(position);
        if let Err(err) = storage::persist_records(self.backend.as_ref(), &self.records) {
            self.records.insert(position, removed);
            return Err(err);
        }

        self.notify(&Change::RecordDeleted(removed));
        Ok(true)
    }

    pub fn set_avatar(&mut self, image_ref: impl Into<String>) -> Result<(), DiaryError> {
        let image_ref = image_ref.into();
        if image_ref.trim().is_empty() {
            return Err(DiaryError::EmptyImage);
        }

        self.backend.set(AVATAR_KEY, &image_ref)?;
        self.avatar = image_ref;
        self.notify(&Change::AvatarChanged);
        Ok(())
    }

    pub fn history_view(&self) -> Vec<Record> {
        views::history_view(&self.records)
    }

    pub fn chart_view(&self) -> Vec<ChartPoint> {
        views::chart_view(&self.records)
    }

    /// Prefers `candidate`, then one past the largest id. When that would
    /// overflow, falls back to the first free id at or after `candidate`.
    fn next_id(&self, candidate: i64) -> i64 {
        let max = match self.records.iter().map(|record| record.id).max() {
            Some(max) if candidate <= max => max,
            _ => return candidate,
        };
        if let Some(id) = max.checked_add(1) {
            return id;
        }

        let taken: HashSet<i64> = self.records.iter().map(|record| record.id).collect();
        (candidate..=i64::MAX)
            .chain(i64::MIN..candidate)
            .find(|id| !taken.contains(id))
            .unwrap_or(candidate)
    }

    fn notify(&self, change: &Change) {
        for listener in &self.listeners {
            listener(change);
        }
    }
}

/// Keeps the first record seen for each date.
fn dedupe_dates(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| seen.insert(record.date))
        .collect();
    if kept.len() != before {
        warn!("dropped {} stored records with duplicate dates", before - kept.len());
    }
    kept
}
