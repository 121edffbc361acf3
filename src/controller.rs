//! Ticket list synchronization.
//!
//! [`TicketListController`] owns one page of the ticket collection and keeps
//! it in step with the backend as the page or the active filters change.
//!
//! Every fetch is tagged with a sequence number when it is issued. A
//! response is committed only if no newer fetch has been issued since, so
//! overlapping requests (rapid paging, filter changes while a page is
//! loading) resolve to the most recent request regardless of the order in
//! which responses arrive. Items and page count are always replaced together
//! from a single response.

use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{HelpdeskError, Result};
use crate::filter::FilterStore;
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::query::TicketQuery;
use crate::remote::{Credential, TicketMutationService, TicketQueryService};
use crate::types::{FilterSet, PageResult, Ticket, TicketProperties};

pub const UPDATED_MESSAGE: &str = "Updated.";
pub const UPDATE_FAILED_MESSAGE: &str = "Couldn't update the ticket.";
pub const DELETED_MESSAGE: &str = "Deleted.";
pub const DELETE_FAILED_MESSAGE: &str = "Couldn't delete the ticket.";

/// Lifecycle of the list data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    /// The latest fetch failed before any page was committed
    Error,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPhase::Uninitialized => write!(f, "uninitialized"),
            LoadPhase::Loading => write!(f, "loading"),
            LoadPhase::Ready => write!(f, "ready"),
            LoadPhase::Error => write!(f, "error"),
        }
    }
}

/// What happened to a fetch that completed without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the displayed page
    Committed,
    /// A newer fetch was issued before this one completed; its response was dropped
    Superseded,
    /// Nothing was fetched (repeated `initialize`)
    Skipped,
}

/// Point-in-time copy of the controller's list state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub page: u32,
    pub items: Vec<Ticket>,
    pub total_pages: u32,
    pub total_items: Option<u64>,
    pub phase: LoadPhase,
    pub filters: FilterSet,
}

#[derive(Debug, Default)]
struct ListState {
    phase: LoadPhase,
    page: u32,
    items: Vec<Ticket>,
    total_pages: u32,
    total_items: Option<u64>,
    /// Sequence number of the most recently issued fetch
    latest_issued: u64,
    /// Set once a page has been committed
    initialized: bool,
    last_error: Option<String>,
}

/// Paged, filtered view over the ticket collection
pub struct TicketListController<B> {
    backend: B,
    credential: Credential,
    notifier: Box<dyn Notifier>,
    filters: Mutex<FilterStore>,
    state: Mutex<ListState>,
}

impl<B> TicketListController<B> {
    /// Create a controller with no filters. Nothing is fetched until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(backend: B, credential: Credential) -> Self {
        Self {
            backend,
            credential,
            notifier: Box::new(TracingNotifier),
            filters: Mutex::new(FilterStore::new()),
            state: Mutex::new(ListState {
                page: 1,
                ..ListState::default()
            }),
        }
    }

    /// Route notifications to `notifier` instead of the log
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Start with `filters` selected
    pub fn with_filters(self, filters: FilterSet) -> Self {
        self.filters.lock().set(filters);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn page(&self) -> u32 {
        self.state.lock().page
    }

    pub fn items(&self) -> Vec<Ticket> {
        self.state.lock().items.clone()
    }

    pub fn total_pages(&self) -> u32 {
        self.state.lock().total_pages
    }

    pub fn total_items(&self) -> Option<u64> {
        self.state.lock().total_items
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.lock().phase
    }

    pub fn filters(&self) -> FilterSet {
        self.filters.lock().get()
    }

    /// Message of the most recent fetch failure, cleared by the next commit.
    ///
    /// A failure after a page has been committed leaves the phase `Ready`
    /// with the last good page; this is how the failure stays visible.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let filters = self.filters();
        let state = self.state.lock();
        ListSnapshot {
            page: state.page,
            items: state.items.clone(),
            total_pages: state.total_pages,
            total_items: state.total_items,
            phase: state.phase,
            filters,
        }
    }

    /// Drop a ticket known to be deleted from the displayed page.
    ///
    /// Returns whether the ticket was on the page.
    pub fn forget_ticket(&self, ticket_id: u64) -> bool {
        let mut state = self.state.lock();
        let before = state.items.len();
        state.items.retain(|t| t.id != ticket_id);
        state.items.len() != before
    }

    /// Move to `page` without fetching. The next fetch (a refresh or a
    /// mutation's refetch) loads it.
    pub fn set_page(&self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(HelpdeskError::InvalidPage(page));
        }
        self.state.lock().page = page;
        Ok(())
    }

    fn begin_fetch(&self) -> u64 {
        let mut state = self.state.lock();
        state.latest_issued += 1;
        state.phase = LoadPhase::Loading;
        state.latest_issued
    }

    fn finish_fetch(&self, sequence: u64, result: Result<PageResult>) -> Result<FetchOutcome> {
        let mut state = self.state.lock();

        if sequence != state.latest_issued {
            debug!(
                sequence,
                latest = state.latest_issued,
                "discarding superseded ticket page"
            );
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(result) => {
                debug!(
                    sequence,
                    count = result.items.len(),
                    total_pages = result.total_pages,
                    "committing ticket page"
                );
                state.items = result.items;
                state.total_pages = result.total_pages;
                state.total_items = result.total_items;
                state.phase = LoadPhase::Ready;
                state.last_error = None;
                state.initialized = true;
                Ok(FetchOutcome::Committed)
            }
            Err(e) => {
                warn!(sequence, "ticket query failed: {e}");
                state.phase = if state.initialized {
                    LoadPhase::Ready
                } else {
                    LoadPhase::Error
                };
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(&notification);
    }
}

impl<B: TicketQueryService> TicketListController<B> {
    async fn fetch(&self, page: u32, filters: FilterSet) -> Result<FetchOutcome> {
        let query = TicketQuery::new(page, filters)?;
        let sequence = self.begin_fetch();
        debug!(sequence, %query, "issuing ticket query");

        let result = self.backend.fetch_page(&query).await;
        self.finish_fetch(sequence, result)
    }

    /// Load page 1 with the current filters.
    ///
    /// Once a page has been committed further calls are skipped; after a
    /// failed first load a call retries it.
    pub async fn initialize(&self) -> Result<FetchOutcome> {
        {
            let mut state = self.state.lock();
            if state.initialized {
                debug!("ticket list already initialized");
                return Ok(FetchOutcome::Skipped);
            }
            state.page = 1;
        }

        let filters = self.filters();
        self.fetch(1, filters).await
    }

    /// Move to `page`. The new page number is visible immediately; items and
    /// page count follow once the response is committed.
    pub async fn go_to_page(&self, page: u32) -> Result<FetchOutcome> {
        self.set_page(page)?;

        let filters = self.filters();
        self.fetch(page, filters).await
    }

    /// Replace the active filters and return to page 1
    pub async fn apply_filters(&self, filters: FilterSet) -> Result<FetchOutcome> {
        self.filters.lock().set(filters.clone());
        self.state.lock().page = 1;

        self.fetch(1, filters).await
    }

    /// Refetch the current page with the current filters
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let page = self.page();
        let filters = self.filters();
        self.fetch(page, filters).await
    }
}

impl<B: TicketQueryService + TicketMutationService> TicketListController<B> {
    /// Change facets of a ticket, then refetch the current page and filters.
    ///
    /// A rejected update raises a failure notification and leaves the list
    /// as it is.
    pub async fn update_ticket_properties(
        &self,
        ticket_id: u64,
        properties: TicketProperties,
    ) -> Result<FetchOutcome> {
        let result = self
            .backend
            .update_ticket(&self.credential, ticket_id, &properties)
            .await;

        match result {
            Ok(()) => {
                self.notify(Notification::success(UPDATED_MESSAGE));
                self.refresh().await
            }
            Err(e) => {
                warn!(ticket_id, "ticket update failed: {e}");
                self.notify(Notification::failure(UPDATE_FAILED_MESSAGE));
                Err(as_mutation_error(e))
            }
        }
    }

    /// Delete a ticket. The caller is responsible for confirming with the
    /// user first. On success the ticket leaves the displayed page at once
    /// and the current page is refetched.
    pub async fn delete_ticket(&self, ticket_id: u64) -> Result<FetchOutcome> {
        let result = self.backend.delete_ticket(&self.credential, ticket_id).await;

        match result {
            Ok(()) => {
                self.forget_ticket(ticket_id);
                self.notify(Notification::success(DELETED_MESSAGE));
                self.refresh().await
            }
            Err(e) => {
                warn!(ticket_id, "ticket delete failed: {e}");
                self.notify(Notification::failure(DELETE_FAILED_MESSAGE));
                Err(as_mutation_error(e))
            }
        }
    }
}

fn as_mutation_error(error: HelpdeskError) -> HelpdeskError {
    match error {
        HelpdeskError::MutationFailed(_) => error,
        other => HelpdeskError::MutationFailed(other.to_string()),
    }
}
