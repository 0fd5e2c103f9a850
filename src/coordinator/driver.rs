//! Async owner of a [`TableQuery`].
//!
//! A single task applies intents, promotes debounced search text and issues
//! fetches against the repository on the blocking pool. Completions come back
//! tagged with their [`Ticket`] and only the latest issued one is applied.

use std::fmt::{Display, Formatter};
use std::future::pending;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::coordinator::{Debouncer, FetchSequence, FilterCell, TableQuery, Ticket};
use crate::domain::customer::Customer;
use crate::domain::query::{FilterBucket, Page, PageQuery, SortColumn};
use crate::pagination::{get_pages, total_pages};
use crate::repository::CustomerReader;
use crate::repository::errors::{RepositoryError, RepositoryResult};

const INTENT_BUFFER: usize = 64;

/// User intent addressed to a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableIntent {
    SearchText(String),
    Sort(SortColumn),
    Filter(FilterBucket),
    Page(usize),
    /// Fetch again with unchanged parameters, e.g. after a write.
    Refresh,
}

/// Out-of-band message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    LoadFailed(String),
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::LoadFailed(reason) => write!(f, "Erro ao carregar clientes: {reason}"),
        }
    }
}

/// Snapshot of what a table shows.
#[derive(Clone, Debug, PartialEq)]
pub struct TableView {
    /// Parameters of the most recently issued fetch.
    pub query: PageQuery,
    pub search_input: String,
    pub items: Vec<Customer>,
    pub total_count: usize,
    pub loading: bool,
}

impl TableView {
    fn new(query: &TableQuery) -> Self {
        Self {
            query: query.descriptor(),
            search_input: query.search_input().to_string(),
            items: Vec::new(),
            total_count: 0,
            loading: false,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_count, self.query.page_size)
    }

    /// Page links around the current page, `None` marking an ellipsis.
    pub fn pages(&self) -> Vec<Option<usize>> {
        get_pages(self.total_pages(), self.query.page)
    }
}

/// Handle used by front ends to drive a running coordinator.
pub struct CoordinatorHandle {
    intents: mpsc::Sender<TableIntent>,
    view: watch::Receiver<TableView>,
    notices: mpsc::UnboundedReceiver<Notice>,
}

impl CoordinatorHandle {
    /// Returns `false` once the coordinator has stopped.
    pub async fn send(&self, intent: TableIntent) -> bool {
        self.intents.send(intent).await.is_ok()
    }

    /// Extra sender for front ends that read input on another task.
    pub fn sender(&self) -> mpsc::Sender<TableIntent> {
        self.intents.clone()
    }

    pub fn snapshot(&self) -> TableView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TableView> {
        self.view.clone()
    }

    pub fn try_notice(&mut self) -> Option<Notice> {
        self.notices.try_recv().ok()
    }

    pub async fn next_notice(&mut self) -> Option<Notice> {
        self.notices.recv().await
    }
}

type Completion = (Ticket, RepositoryResult<Page<Customer>>);

/// Coordinates one customer table against a repository.
pub struct TableCoordinator<G> {
    gateway: Arc<G>,
    query: TableQuery,
    debouncer: Debouncer<String>,
    sequence: FetchSequence,
    last_issued: Option<PageQuery>,
    view: TableView,
    filter: FilterCell,
    filter_changes: watch::Receiver<FilterBucket>,
    intents: mpsc::Receiver<TableIntent>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    view_tx: watch::Sender<TableView>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl<G> TableCoordinator<G>
where
    G: CustomerReader + Send + Sync + 'static,
{
    /// Starts a coordinator task. The table begins on the bucket held by
    /// `filter` and fetches its first page immediately.
    pub fn spawn(
        gateway: Arc<G>,
        query: TableQuery,
        filter: FilterCell,
    ) -> (CoordinatorHandle, JoinHandle<()>) {
        let (intents_tx, intents) = mpsc::channel(INTENT_BUFFER);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();

        let mut query = query;
        let mut filter_changes = filter.subscribe();
        let bucket = *filter_changes.borrow_and_update();
        if query.filter() != bucket {
            query.set_filter_bucket(bucket);
        }

        let view = TableView::new(&query);
        let (view_tx, view_rx) = watch::channel(view.clone());

        let coordinator = Self {
            gateway,
            query,
            debouncer: Debouncer::default(),
            sequence: FetchSequence::new(),
            last_issued: None,
            view,
            filter,
            filter_changes,
            intents,
            completions_tx,
            completions,
            view_tx,
            notices: notices_tx,
        };

        let task = tokio::spawn(coordinator.run());
        let handle = CoordinatorHandle {
            intents: intents_tx,
            view: view_rx,
            notices: notices_rx,
        };
        (handle, task)
    }

    async fn run(mut self) {
        self.issue_fetch();

        loop {
            let deadline = self.debouncer.deadline();
            let mut force = false;

            tokio::select! {
                intent = self.intents.recv() => match intent {
                    Some(TableIntent::Refresh) => force = true,
                    Some(intent) => self.apply(intent),
                    None => break,
                },
                _ = wait_until(deadline) => {
                    if let Some(text) = self.debouncer.poll(Instant::now()) {
                        self.query.promote_search(&text);
                    }
                },
                Some((ticket, result)) = self.completions.recv() => {
                    self.complete(ticket, result);
                    continue;
                },
                Ok(()) = self.filter_changes.changed() => {
                    let bucket = *self.filter_changes.borrow_and_update();
                    if bucket != self.query.filter() {
                        self.query.set_filter_bucket(bucket);
                    }
                },
            }

            self.sync_input();
            if force || self.last_issued.as_ref() != Some(&self.query.descriptor()) {
                self.issue_fetch();
            }
        }

        log::debug!("Table coordinator stopped");
    }

    fn apply(&mut self, intent: TableIntent) {
        match intent {
            TableIntent::SearchText(raw) => {
                self.query.set_search_text(raw.clone());
                self.debouncer.push(raw, Instant::now());
            }
            TableIntent::Sort(column) => self.query.set_sort(column),
            TableIntent::Filter(bucket) => {
                self.filter.set(bucket);
                self.query.set_filter_bucket(bucket);
            }
            TableIntent::Page(page) => self.query.set_page(page),
            TableIntent::Refresh => {}
        }
    }

    /// Publishes typed search text without waiting for a fetch.
    fn sync_input(&mut self) {
        if self.view.search_input != self.query.search_input() {
            self.view.search_input = self.query.search_input().to_string();
            self.publish();
        }
    }

    fn issue_fetch(&mut self) {
        let descriptor = self.query.descriptor();
        let ticket = self.sequence.issue();
        log::debug!("Issuing fetch {ticket} for {descriptor:?}");

        self.last_issued = Some(descriptor.clone());
        self.view.query = descriptor.clone();
        self.view.loading = true;
        self.publish();

        let gateway = Arc::clone(&self.gateway);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                gateway.list_customers(&descriptor, Utc::now().naive_utc())
            })
            .await
            .unwrap_or_else(|err| Err(RepositoryError::Unexpected(format!("fetch task failed: {err}"))));

            if completions.send((ticket, result)).is_err() {
                log::debug!("Coordinator gone before fetch {ticket} completed");
            }
        });
    }

    fn complete(&mut self, ticket: Ticket, result: RepositoryResult<Page<Customer>>) {
        if !self.sequence.is_current(ticket) {
            log::debug!("Discarding stale fetch {ticket}");
            return;
        }

        self.view.loading = false;
        match result {
            Ok(page) => {
                self.view.items = page.items;
                self.view.total_count = page.total_count;
            }
            Err(err) => {
                log::error!("Failed to load customers: {err}");
                self.view.items.clear();
                self.view.total_count = 0;
                if self.notices.send(Notice::LoadFailed(err.to_string())).is_err() {
                    log::debug!("No listener for coordinator notices");
                }
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.view_tx.send_replace(self.view.clone());
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::dashboard::DashboardAggregate;
    use crate::domain::query::SortDirection;
    use crate::domain::types::CustomerId;

    /// Records every query and answers with `total` rows.
    struct RecordingGateway {
        total: usize,
        fail: bool,
        queries: Mutex<Vec<PageQuery>>,
    }

    impl RecordingGateway {
        fn new(total: usize) -> Self {
            Self {
                total,
                fail: false,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(0)
            }
        }

        fn queries(&self) -> Vec<PageQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl CustomerReader for RecordingGateway {
        fn get_customer_by_id(&self, _id: CustomerId) -> RepositoryResult<Option<Customer>> {
            Ok(None)
        }

        fn list_customers(
            &self,
            query: &PageQuery,
            _now: NaiveDateTime,
        ) -> RepositoryResult<Page<Customer>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(RepositoryError::ConnectionError("offline".to_string()));
            }
            Ok(Page::new(Vec::new(), self.total))
        }

        fn dashboard_aggregate(&self, _now: NaiveDateTime) -> RepositoryResult<DashboardAggregate> {
            Ok(DashboardAggregate::default())
        }
    }

    /// Holds every page-2 request until released; answers `page * 10` rows.
    struct GatedGateway {
        gate: Mutex<std::sync::mpsc::Receiver<()>>,
        finished: AtomicUsize,
    }

    impl CustomerReader for GatedGateway {
        fn get_customer_by_id(&self, _id: CustomerId) -> RepositoryResult<Option<Customer>> {
            Ok(None)
        }

        fn list_customers(
            &self,
            query: &PageQuery,
            _now: NaiveDateTime,
        ) -> RepositoryResult<Page<Customer>> {
            if query.page == 2 {
                let _ = self.gate.lock().unwrap().recv();
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(Page::new(Vec::new(), query.page * 10))
        }

        fn dashboard_aggregate(&self, _now: NaiveDateTime) -> RepositoryResult<DashboardAggregate> {
            Ok(DashboardAggregate::default())
        }
    }

    /// Waits until no fetch is in flight and `ready` holds.
    async fn settled(handle: &CoordinatorHandle, ready: impl Fn(&TableView) -> bool) -> TableView {
        let mut view = handle.subscribe();
        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            view.wait_for(|v| !v.loading && ready(v)),
        )
        .await
        .expect("coordinator settled")
        .expect("coordinator running")
        .clone();
        snapshot
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_within_the_quiet_period_promote_once() {
        let gateway = Arc::new(RecordingGateway::new(3));
        let (handle, _task) =
            TableCoordinator::spawn(gateway.clone(), TableQuery::default(), FilterCell::default());
        settled(&handle, |v| v.total_count == 3).await;

        for text in ["m", "ma", "mar"] {
            handle.send(TableIntent::SearchText(text.to_string())).await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(handle.snapshot().search_input, "mar");
        assert_eq!(gateway.queries().len(), 1);

        tokio::time::sleep(Duration::from_millis(450)).await;
        let view = settled(&handle, |v| v.query.search.is_some()).await;

        let searches: Vec<_> = gateway
            .queries()
            .into_iter()
            .filter_map(|q| q.search)
            .collect();
        assert_eq!(searches, vec!["mar".to_string()]);
        assert_eq!(view.query.search.as_deref(), Some("mar"));
    }

    #[tokio::test(start_paused = true)]
    async fn parameter_changes_reset_the_page_before_fetching() {
        let gateway = Arc::new(RecordingGateway::new(95));
        let (handle, _task) =
            TableCoordinator::spawn(gateway.clone(), TableQuery::default(), FilterCell::default());
        settled(&handle, |v| v.total_count == 95).await;

        handle.send(TableIntent::Page(5)).await;
        let view = settled(&handle, |v| v.query.page == 5).await;
        assert_eq!(
            view.pages(),
            vec![
                Some(1),
                None,
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                None,
                Some(10)
            ]
        );

        handle.send(TableIntent::Sort(SortColumn::Email)).await;
        let view = settled(&handle, |v| v.query.sort_column == SortColumn::Email).await;
        assert_eq!(view.query.page, 1);
        assert_eq!(view.query.sort_direction, SortDirection::Asc);

        let last = gateway.queries().pop().unwrap();
        assert_eq!(last.page, 1);
        assert_eq!(last.sort_column, SortColumn::Email);
    }

    #[tokio::test(start_paused = true)]
    async fn filter_cell_changes_reach_the_table() {
        let gateway = Arc::new(RecordingGateway::new(40));
        let cell = FilterCell::default();
        let (handle, _task) =
            TableCoordinator::spawn(gateway.clone(), TableQuery::default(), cell.clone());
        settled(&handle, |v| v.total_count == 40).await;

        handle.send(TableIntent::Page(2)).await;
        settled(&handle, |v| v.query.page == 2).await;

        cell.set(FilterBucket::PendingReview);
        let view = settled(&handle, |v| v.query.filter == FilterBucket::PendingReview).await;

        assert_eq!(view.query.page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn filter_intent_updates_the_shared_cell() {
        let gateway = Arc::new(RecordingGateway::new(0));
        let cell = FilterCell::default();
        let (handle, _task) = TableCoordinator::spawn(gateway, TableQuery::default(), cell.clone());

        handle
            .send(TableIntent::Filter(FilterBucket::Recent30Days))
            .await;
        settled(&handle, |v| v.query.filter == FilterBucket::Recent30Days).await;

        assert_eq!(cell.get(), FilterBucket::Recent30Days);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_empties_the_table_and_emits_a_notice() {
        let gateway = Arc::new(RecordingGateway::failing());
        let (mut handle, _task) =
            TableCoordinator::spawn(gateway, TableQuery::default(), FilterCell::default());

        let notice = handle.next_notice().await.unwrap();
        assert!(matches!(notice, Notice::LoadFailed(_)));

        let view = settled(&handle, |_| true).await;
        assert!(view.items.is_empty());
        assert_eq!(view.total_count, 0);
        assert!(view.pages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_fetches_again_with_the_same_parameters() {
        let gateway = Arc::new(RecordingGateway::new(1));
        let (handle, _task) =
            TableCoordinator::spawn(gateway.clone(), TableQuery::default(), FilterCell::default());
        settled(&handle, |v| v.total_count == 1).await;

        handle.send(TableIntent::Refresh).await;
        while gateway.queries().len() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let queries = gateway.queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], queries[1]);
    }

    #[tokio::test]
    async fn late_response_of_a_superseded_fetch_is_discarded() {
        let (release, gate) = std::sync::mpsc::channel();
        let gateway = Arc::new(GatedGateway {
            gate: Mutex::new(gate),
            finished: AtomicUsize::new(0),
        });
        let (handle, _task) =
            TableCoordinator::spawn(gateway.clone(), TableQuery::default(), FilterCell::default());
        settled(&handle, |v| v.total_count == 10).await;

        handle.send(TableIntent::Page(2)).await;
        handle.send(TableIntent::Page(3)).await;
        let view = settled(&handle, |v| v.query.page == 3).await;
        assert_eq!(view.total_count, 30);

        release.send(()).unwrap();
        while gateway.finished.load(Ordering::SeqCst) < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        let view = handle.snapshot();
        assert_eq!(view.query.page, 3);
        assert_eq!(view.total_count, 30);
        assert!(!view.loading);
    }
}
