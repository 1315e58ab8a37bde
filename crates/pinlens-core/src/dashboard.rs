//! Application state controller
//!
//! [`Dashboard`] owns everything the presentation layer reads: the last
//! loaded [`Snapshot`], one [`ViewState`] per table and the sync status.
//! A refresh either replaces the whole snapshot or changes nothing but the
//! status and the error message.

use crate::config::DashboardConfig;
use crate::error::{DashboardError, StoreError};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use pinlens_analytics::{compute_analytics, AggregateSnapshot};
use pinlens_schema::{Record, TableKind, TableSet};
use pinlens_view::{render, RenderedPage, ViewState};
use serde::Serialize;

/// Point-in-time copy of every table plus its derived statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Records per table
    pub tables: TableSet,
    /// Statistics computed from `tables`
    pub analytics: AggregateSnapshot,
    /// When the refresh completed
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build from loaded tables, computing analytics
    #[must_use]
    pub fn new(tables: TableSet, loaded_at: DateTime<Utc>) -> Self {
        let analytics = compute_analytics(&tables);
        Self {
            tables,
            analytics,
            loaded_at,
        }
    }
}

/// Connection indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// No refresh attempted yet
    #[default]
    NeverSynced,
    /// Refresh in flight
    Syncing,
    /// Last refresh succeeded
    Connected,
    /// Last refresh failed
    Disconnected,
}

impl SyncStatus {
    /// Indicator label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeverSynced => "Not synced",
            Self::Syncing => "Syncing...",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

/// Dashboard controller
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    snapshot: Option<Snapshot>,
    views: [ViewState; TableKind::ALL.len()],
    status: SyncStatus,
    settled_status: SyncStatus,
    last_error: Option<String>,
}

impl Dashboard {
    /// Create with nothing loaded
    ///
    /// Every table view starts on page 1 with the configured page size.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let page_size = config.page_size;
        Self {
            config,
            snapshot: None,
            views: std::array::from_fn(|_| ViewState::new(page_size)),
            status: SyncStatus::NeverSynced,
            settled_status: SyncStatus::NeverSynced,
            last_error: None,
        }
    }

    /// Reload every table from `store`
    ///
    /// Tables are fetched concurrently. The snapshot is replaced only when
    /// all of them load; view states keep their search, sort and facets.
    /// Dropping the returned future before it completes leaves the
    /// dashboard untouched.
    ///
    /// # Errors
    ///
    /// The first store failure. The previous snapshot and view states are
    /// left as they were.
    pub async fn refresh(&mut self, store: &dyn RecordStore) -> Result<(), DashboardError> {
        let result = Self::fetch(&self.config, store).await;
        self.finish_refresh(result)
    }

    /// Load every table named by `config` into a new snapshot
    ///
    /// Borrows no dashboard state, so the dashboard can keep rendering while
    /// this runs. Pair with [`Dashboard::begin_refresh`] and
    /// [`Dashboard::finish_refresh`].
    ///
    /// # Errors
    ///
    /// The first store failure.
    pub async fn fetch(
        config: &DashboardConfig,
        store: &dyn RecordStore,
    ) -> Result<Snapshot, StoreError> {
        tracing::info!("Refreshing {} tables", TableKind::ALL.len());

        let fetches = TableKind::ALL.iter().map(|&kind| {
            let name = config.table_name(kind);
            async move {
                let records = store.fetch_table(name).await?;
                Ok::<(TableKind, Vec<Record>), StoreError>((kind, records))
            }
        });

        let mut tables = TableSet::new();
        for (kind, records) in try_join_all(fetches).await? {
            tables.insert(kind, records);
        }
        Ok(Snapshot::new(tables, Utc::now()))
    }

    /// Mark a refresh as in flight
    pub fn begin_refresh(&mut self) {
        if self.status != SyncStatus::Syncing {
            self.settled_status = self.status;
            self.status = SyncStatus::Syncing;
        }
    }

    /// Put back the status held before [`Dashboard::begin_refresh`]
    pub fn cancel_refresh(&mut self) {
        if self.status == SyncStatus::Syncing {
            tracing::debug!("Refresh abandoned");
            self.status = self.settled_status;
        }
    }

    /// Install the outcome of [`Dashboard::fetch`]
    ///
    /// # Errors
    ///
    /// The store failure carried by `result`; the snapshot is kept.
    pub fn finish_refresh(
        &mut self,
        result: Result<Snapshot, StoreError>,
    ) -> Result<(), DashboardError> {
        match result {
            Ok(snapshot) => {
                tracing::info!(
                    "Refresh complete: {} records, {} pins analyzed",
                    snapshot.tables.total_records(),
                    snapshot.analytics.analyzed_pins
                );
                self.replace_snapshot(snapshot);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Refresh failed: {}", err);
                self.status = SyncStatus::Disconnected;
                self.settled_status = SyncStatus::Disconnected;
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Install an already loaded snapshot
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        self.status = SyncStatus::Connected;
        self.settled_status = SyncStatus::Connected;
        self.last_error = None;
    }

    /// Render the current page of a table
    ///
    /// Before the first successful refresh every table renders empty.
    #[must_use]
    pub fn render(&self, kind: TableKind) -> RenderedPage {
        render(kind.schema(), self.records(kind), self.view(kind))
    }

    /// Records of a table in the current snapshot
    #[must_use]
    pub fn records(&self, kind: TableKind) -> &[Record] {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.tables.get(kind))
            .unwrap_or_default()
    }

    /// View state of a table
    #[inline]
    #[must_use]
    pub fn view(&self, kind: TableKind) -> &ViewState {
        &self.views[kind as usize]
    }

    /// Mutable view state of a table
    #[inline]
    pub fn view_mut(&mut self, kind: TableKind) -> &mut ViewState {
        &mut self.views[kind as usize]
    }

    /// Set the search text of a table
    pub fn set_search(&mut self, kind: TableKind, text: &str) {
        self.view_mut(kind).set_search(text);
    }

    /// Sort a table by a column, flipping direction on repeat
    ///
    /// # Errors
    ///
    /// [`DashboardError::View`] when the column is not in the table's schema.
    pub fn set_sort(&mut self, kind: TableKind, column: &str) -> Result<(), DashboardError> {
        self.view_mut(kind).set_sort(kind.schema(), column)?;
        Ok(())
    }

    /// Request a page of a table
    pub fn set_page(&mut self, kind: TableKind, page: usize) {
        self.view_mut(kind).set_page(page);
    }

    /// Change the page size of a table
    ///
    /// # Errors
    ///
    /// [`DashboardError::View`] when `page_size` is zero.
    pub fn set_page_size(&mut self, kind: TableKind, page_size: usize) -> Result<(), DashboardError> {
        self.view_mut(kind).set_page_size(page_size)?;
        Ok(())
    }

    /// Restrict a table to rows whose column equals `value`
    ///
    /// # Errors
    ///
    /// [`DashboardError::View`] when the column is not in the table's schema.
    pub fn set_facet(
        &mut self,
        kind: TableKind,
        column: &str,
        value: &str,
    ) -> Result<(), DashboardError> {
        self.view_mut(kind).set_facet(kind.schema(), column, value)?;
        Ok(())
    }

    /// Statistics of the current snapshot
    #[must_use]
    pub fn analytics(&self) -> Option<&AggregateSnapshot> {
        self.snapshot.as_ref().map(|snapshot| &snapshot.analytics)
    }

    /// Current snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Sync status
    #[inline]
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Message of the last failed refresh
    #[inline]
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::store::{MemoryStore, PagedStore};
    use pinlens_test_utils::{numbered_pins, sample_tables};

    fn store_with(tables: &TableSet) -> PagedStore<MemoryStore> {
        let config = DashboardConfig::default();
        let mut source = MemoryStore::new().with_page_size(10);
        for kind in TableKind::ALL {
            source = source.with_table(config.table_name(kind), tables.get(kind).to_vec());
        }
        PagedStore::new(source, RetryPolicy::default())
    }

    #[test]
    fn starts_empty() {
        let dashboard = Dashboard::new(DashboardConfig::default().with_page_size(5));
        assert_eq!(dashboard.status(), SyncStatus::NeverSynced);
        assert!(dashboard.analytics().is_none());
        assert_eq!(dashboard.view(TableKind::ContentQueue).page_size(), 5);
        assert!(dashboard.render(TableKind::CompetitorPins).rows.is_empty());
    }

    #[tokio::test]
    async fn refresh_loads_every_table() {
        let tables = sample_tables();
        let store = store_with(&tables);
        let mut dashboard = Dashboard::new(DashboardConfig::default());

        dashboard.refresh(&store).await.unwrap();
        assert_eq!(dashboard.status(), SyncStatus::Connected);
        assert_eq!(dashboard.snapshot().unwrap().tables, tables);
        assert_eq!(
            dashboard.analytics().unwrap().total_pins,
            tables.get(TableKind::CompetitorPins).len()
        );
    }

    #[tokio::test]
    async fn failed_refresh_keeps_snapshot_and_views() {
        let store = store_with(&TableSet::new().with_table(TableKind::CompetitorPins, numbered_pins(30)));
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        dashboard.refresh(&store).await.unwrap();
        dashboard.set_sort(TableKind::CompetitorPins, "Saves").unwrap();
        dashboard.set_page(TableKind::CompetitorPins, 2);
        let before = dashboard.snapshot().cloned();
        let view_before = dashboard.view(TableKind::CompetitorPins).clone();

        store
            .source()
            .push_failure(StoreError::from_response("Pin Analysis", 401, r#"{"error":{"message":"Invalid API key"}}"#));
        let err = dashboard.refresh(&store).await.unwrap_err();

        assert_eq!(err.user_message(), "Invalid API key");
        assert_eq!(dashboard.status(), SyncStatus::Disconnected);
        assert_eq!(dashboard.last_error(), Some("Invalid API key"));
        assert_eq!(dashboard.snapshot().cloned(), before);
        assert_eq!(dashboard.view(TableKind::CompetitorPins), &view_before);
    }

    #[tokio::test]
    async fn split_refresh_renders_while_syncing() {
        let store = store_with(&TableSet::new().with_table(TableKind::CompetitorPins, numbered_pins(3)));
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        dashboard.refresh(&store).await.unwrap();

        store.source().insert_table("Competitor Pins", numbered_pins(8));
        dashboard.begin_refresh();
        let config = dashboard.config().clone();
        let fetched = Dashboard::fetch(&config, &store).await;

        assert_eq!(dashboard.status(), SyncStatus::Syncing);
        assert_eq!(dashboard.render(TableKind::CompetitorPins).rows.len(), 3);

        dashboard.finish_refresh(fetched).unwrap();
        assert_eq!(dashboard.status(), SyncStatus::Connected);
        assert_eq!(dashboard.records(TableKind::CompetitorPins).len(), 8);
    }

    #[test]
    fn cancel_restores_settled_status() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        dashboard.begin_refresh();
        dashboard.begin_refresh();
        assert_eq!(dashboard.status(), SyncStatus::Syncing);
        dashboard.cancel_refresh();
        assert_eq!(dashboard.status(), SyncStatus::NeverSynced);

        let err = StoreError::from_response("Pin Analysis", 500, "");
        dashboard.begin_refresh();
        assert!(dashboard.finish_refresh(Err(err)).is_err());
        dashboard.begin_refresh();
        dashboard.cancel_refresh();
        assert_eq!(dashboard.status(), SyncStatus::Disconnected);
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        let mut dashboard = Dashboard::new(DashboardConfig::default());
        if !pinlens_view::strict_debug() {
            let err = dashboard.set_sort(TableKind::PinAnalysis, "Nope").unwrap_err();
            assert!(matches!(err, DashboardError::View(_)));
            assert!(dashboard.view(TableKind::PinAnalysis).sort().is_none());
        }
    }

    #[test]
    fn status_labels() {
        assert_eq!(SyncStatus::Disconnected.label(), "Disconnected");
        assert_eq!(SyncStatus::default(), SyncStatus::NeverSynced);
    }
}
