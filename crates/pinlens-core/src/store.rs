//! Record store interface
//!
//! The dashboard only sees [`RecordStore`]: whole tables in, single records
//! out. Remote backends implement the smaller [`PageSource`] and
//! [`RecordWriter`] traits and get cursor draining plus rate-limit retry
//! from [`PagedStore`].

use crate::config::RetryPolicy;
use crate::error::StoreError;
use indexmap::IndexMap;
use pinlens_schema::Record;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One page of a table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records on this page
    pub records: Vec<Record>,
    /// Cursor of the next page, `None` on the last one
    pub offset: Option<String>,
}

/// Source of table pages
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page at `offset` (`None` for the first page)
    async fn fetch_page(&self, table: &str, offset: Option<&str>) -> Result<Page, StoreError>;
}

/// Record write-back
#[async_trait::async_trait]
pub trait RecordWriter: Send + Sync {
    /// Create a record, returning it with its assigned id
    async fn create_record(&self, table: &str, fields: Map<String, Value>)
        -> Result<Record, StoreError>;

    /// Merge `fields` into an existing record
    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError>;
}

/// Whole-table record store
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record of a table, pagination fully drained
    async fn fetch_table(&self, table: &str) -> Result<Vec<Record>, StoreError>;

    /// Create a record
    async fn create_record(&self, table: &str, fields: Map<String, Value>)
        -> Result<Record, StoreError>;

    /// Merge `fields` into an existing record
    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError>;
}

/// [`RecordStore`] over a paged backend
///
/// Rate-limited pages are retried after the policy's back-off, up to
/// `max_retries` consecutive times; the counter resets after every
/// successful page.
#[derive(Debug)]
pub struct PagedStore<S> {
    source: S,
    retry: RetryPolicy,
}

impl<S> PagedStore<S> {
    /// Wrap a backend
    #[must_use]
    pub fn new(source: S, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    /// The wrapped backend
    #[inline]
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Retry policy in use
    #[inline]
    #[must_use]
    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }
}

#[async_trait::async_trait]
impl<S> RecordStore for PagedStore<S>
where
    S: PageSource + RecordWriter,
{
    async fn fetch_table(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let mut all = Vec::new();
        let mut offset: Option<String> = None;
        let mut retries = 0u32;

        loop {
            match self.source.fetch_page(table, offset.as_deref()).await {
                Ok(page) => {
                    retries = 0;
                    tracing::debug!("Fetched {} records from {}", page.records.len(), table);
                    all.extend(page.records);
                    match page.offset {
                        Some(next) => offset = Some(next),
                        None => break,
                    }
                }
                Err(err) if err.is_rate_limited() => {
                    retries += 1;
                    if retries > self.retry.max_retries {
                        tracing::error!("Giving up on {} after {} rate-limited attempts", table, retries);
                        return Err(StoreError::RateLimited { attempts: retries });
                    }
                    tracing::warn!(
                        "Rate limited on {}, retry {}/{}",
                        table,
                        retries,
                        self.retry.max_retries
                    );
                    tokio::time::sleep(self.retry.backoff()).await;
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!("Loaded {} records from {}", all.len(), table);
        Ok(all)
    }

    async fn create_record(
        &self,
        table: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        self.source.create_record(table, fields).await
    }

    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        self.source.update_record(table, id, fields).await
    }
}

/// Default page size of [`MemoryStore`]
pub const MEMORY_PAGE_SIZE: usize = 100;

/// In-process paged backend
///
/// Serves tables from memory with the same cursor protocol as a remote
/// store. Outcomes queued with [`MemoryStore::push_failure`] and
/// [`MemoryStore::push_pass`] apply, in order, to the next page requests.
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<IndexMap<String, Vec<Record>>>,
    scripted: Mutex<VecDeque<Option<StoreError>>>,
    page_size: usize,
    page_requests: AtomicUsize,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(IndexMap::new()),
            scripted: Mutex::new(VecDeque::new()),
            page_size: MEMORY_PAGE_SIZE,
            page_requests: AtomicUsize::new(0),
            next_id: AtomicU64::new(1),
        }
    }

    /// With page size (at least 1)
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// With a table's records
    #[must_use]
    pub fn with_table(self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.insert_table(name, records);
        self
    }

    /// Load `{ "<table name>": [ {id, fields, createdTime}, ... ] }`
    ///
    /// # Errors
    ///
    /// [`StoreError::Decode`] when the JSON does not have that shape.
    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        let tables: IndexMap<String, Vec<Record>> =
            serde_json::from_str(raw).map_err(|e| StoreError::Decode(e.to_string()))?;
        let store = Self::new();
        for (name, records) in tables {
            store.insert_table(name, records);
        }
        Ok(store)
    }

    /// Replace a table's records
    pub fn insert_table(&self, name: impl Into<String>, records: Vec<Record>) {
        lock(&self.tables).insert(name.into(), records);
    }

    /// Queue a failure for an upcoming page request
    pub fn push_failure(&self, err: StoreError) {
        lock(&self.scripted).push_back(Some(err));
    }

    /// Queue a normally served page request ahead of later failures
    pub fn push_pass(&self) {
        lock(&self.scripted).push_back(None);
    }

    /// Page requests served so far, failures included
    #[must_use]
    pub fn page_requests(&self) -> usize {
        self.page_requests.load(Ordering::SeqCst)
    }

    /// Names of the stored tables
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        lock(&self.tables).keys().cloned().collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait::async_trait]
impl PageSource for MemoryStore {
    async fn fetch_page(&self, table: &str, offset: Option<&str>) -> Result<Page, StoreError> {
        self.page_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(Some(err)) = lock(&self.scripted).pop_front() {
            return Err(err);
        }

        let start = match offset {
            None => 0,
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| StoreError::Decode(format!("invalid offset '{raw}'")))?,
        };

        let tables = lock(&self.tables);
        let records = tables
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        let start = start.min(records.len());
        let end = (start + self.page_size).min(records.len());
        Ok(Page {
            records: records[start..end].to_vec(),
            offset: (end < records.len()).then(|| end.to_string()),
        })
    }
}

#[async_trait::async_trait]
impl RecordWriter for MemoryStore {
    async fn create_record(
        &self,
        table: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut record = Record::new(format!("recMem{n:08}"), fields);
        record.created_time = Some(chrono::Utc::now().to_rfc3339());

        let mut tables = lock(&self.tables);
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        rows.push(record.clone());
        tracing::debug!("Created {} in {}", record.id, table);
        Ok(record)
    }

    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let mut tables = lock(&self.tables);
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        let record = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::RecordNotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        record.fields.extend(fields);
        tracing::debug!("Updated {} in {}", id, table);
        Ok(record.clone())
    }
}
