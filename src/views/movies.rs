//! Movie list page state: filter form, pagination cursor, results

use crate::api::models::{Movie, MovieFilters, Page};
use crate::api::CatalogApi;
use crate::core::error::Result;
use crate::core::sequence::{RequestSequencer, Ticket};

/// A list request that has been issued but not yet applied
#[derive(Debug, Clone)]
pub struct LoadTicket {
    ticket: Ticket,
    /// Filters (including page and limit) the request was made with
    pub filters: MovieFilters,
}

#[derive(Debug)]
pub struct MovieListView {
    /// Filter form state; `page`/`limit` in here are ignored in favour of the cursor
    pub filters: MovieFilters,
    pub page: u32,
    pub limit: u32,
    pub movies: Page<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    sequencer: RequestSequencer,
}

impl MovieListView {
    pub fn new(limit: u32) -> Self {
        Self {
            filters: MovieFilters::default(),
            page: 1,
            limit,
            movies: Page::empty(),
            loading: false,
            error: None,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Mark a load as started and hand out the request to perform.
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loading = true;
        self.error = None;
        LoadTicket {
            ticket: self.sequencer.next(),
            filters: MovieFilters {
                page: Some(self.page),
                limit: Some(self.limit),
                ..self.filters.clone()
            },
        }
    }

    /// Apply a response. Returns `false` (and changes nothing) when a newer
    /// load has been started since `ticket` was issued.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Page<Movie>>) -> bool {
        if !self.sequencer.is_current(ticket.ticket) {
            tracing::debug!(ticket = ticket.ticket.value(), "Dropping superseded movie list response");
            return false;
        }

        match result {
            Ok(page) => {
                self.movies = page;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load movies");
                self.error = Some(format!("Failed to load movies: {}", e.user_message()));
            }
        }
        self.loading = false;
        true
    }

    /// Fetch the current page with the current filters
    pub async fn load(&mut self, catalog: &CatalogApi) {
        let ticket = self.begin_load();
        let result = catalog.list_movies(&ticket.filters).await;
        self.finish_load(ticket, result);
    }

    /// Replace the filters and go back to the first page
    pub async fn apply_filters(&mut self, catalog: &CatalogApi, filters: MovieFilters) {
        self.filters = filters;
        self.page = 1;
        self.load(catalog).await;
    }

    pub async fn reset_filters(&mut self, catalog: &CatalogApi) {
        self.apply_filters(catalog, MovieFilters::default()).await;
    }

    pub async fn next_page(&mut self, catalog: &CatalogApi) -> bool {
        if !self.movies.has_next() {
            return false;
        }
        self.page += 1;
        self.load(catalog).await;
        true
    }

    pub async fn prev_page(&mut self, catalog: &CatalogApi) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.load(catalog).await;
        true
    }

    pub async fn go_to_page(&mut self, catalog: &CatalogApi, page: u32) {
        self.page = page.max(1);
        self.load(catalog).await;
    }
}
