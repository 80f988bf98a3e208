//! Result store: owns the filter state, the fetched books and the derived
//! subset, and decides what the render sink sees.

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{Book, FilterForm, FilterState, RawVolume};
use crate::normalize::Normalizer;
use crate::paginate::{PageView, Paginator};
use crate::pipeline::{ResultSet, recompute};
use crate::query::{QueryBuilder, SearchRequest};
use crate::render::{CatalogView, RenderSink};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to load books from Google Books. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Identifies one fetch. Only the most recently issued ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

pub struct Catalog {
    filters: FilterState,
    results: ResultSet,
    status: FetchStatus,
    generation: u64,
    query: QueryBuilder,
    paginator: Paginator,
    normalizer: Normalizer,
}

impl Catalog {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_parts(
            QueryBuilder::from_config(&config.api, &config.catalog),
            Paginator::new(config.catalog.page_size, config.catalog.page_window),
            Normalizer::new(config.catalog.rating_placeholder),
        )
    }

    pub fn with_parts(query: QueryBuilder, paginator: Paginator, normalizer: Normalizer) -> Self {
        Self {
            filters: FilterState::default(),
            results: ResultSet::default(),
            status: FetchStatus::Idle,
            generation: 0,
            query,
            paginator,
            normalizer,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Request for the current filters.
    pub fn request(&self) -> SearchRequest {
        self.query.build(&self.filters)
    }

    // ─── Filter actions ────────────────────────────────────

    /// Take a submitted filter form. Keyword and genres live in the query, so
    /// the caller must refetch.
    pub fn apply_form(&mut self, form: &FilterForm) {
        self.set_filters(FilterState::from_form(form));
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = FilterState {
            current_page: 1,
            ..filters
        };
    }

    /// Back to defaults. The caller must refetch.
    pub fn reset(&mut self) {
        self.filters = FilterState::default();
    }

    // ─── Fetch lifecycle ───────────────────────────────────

    /// Start a fetch for the current filters. Any earlier ticket goes stale.
    pub fn begin_fetch(&mut self) -> (FetchTicket, SearchRequest) {
        self.generation += 1;
        self.status = FetchStatus::Loading;
        (FetchTicket(self.generation), self.request())
    }

    /// Store a fetch outcome. Returns false, leaving everything untouched, when
    /// a newer fetch has been started since `ticket` was issued.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, outcome: Result<Vec<RawVolume>>) -> bool {
        if ticket.0 != self.generation {
            warn!(
                ticket = ticket.0,
                latest = self.generation,
                "dropping response from superseded fetch"
            );
            return false;
        }

        match outcome {
            Ok(items) => {
                self.results.all = self.normalizer.normalize_all(&items);
                self.status = FetchStatus::Ready;
                self.refilter();
            }
            Err(e) => {
                self.results.clear();
                self.filters.current_page = 1;
                self.status = FetchStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Recompute the filtered subset from the last fetch and go to page 1.
    pub fn refilter(&mut self) {
        self.results.filtered = recompute(&self.results.all, &self.filters);
        self.filters.current_page = 1;
        debug!(
            fetched = self.results.all.len(),
            shown = self.results.filtered.len(),
            "recomputed filtered set"
        );
    }

    // ─── Pagination ────────────────────────────────────────

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.results.filtered.len())
    }

    pub fn next_page(&mut self) -> bool {
        if self.filters.current_page < self.total_pages() {
            self.filters.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.filters.current_page > 1 {
            self.filters.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump straight to `page`. Callers offer only numbers from the window.
    pub fn goto_page(&mut self, page: usize) {
        self.filters.current_page = page;
    }

    pub fn page(&self) -> PageView<'_> {
        self.paginator
            .page(&self.results.filtered, self.filters.current_page)
    }

    // ─── Presentation ──────────────────────────────────────

    pub fn view(&self) -> CatalogView<'_> {
        match &self.status {
            FetchStatus::Idle => CatalogView::Idle,
            FetchStatus::Loading => CatalogView::Loading,
            FetchStatus::Ready => CatalogView::Page(self.page()),
            FetchStatus::Failed(_) => CatalogView::Failed(FETCH_FAILED_MESSAGE),
        }
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        self.view().render_to(sink);
    }

    /// Normalize a record fetched outside the search flow, e.g. by id.
    pub fn normalize(&mut self, item: &RawVolume) -> Book {
        self.normalizer.normalize(item)
    }

    /// Look a book up in the last fetch.
    pub fn find_book(&self, id: &str) -> Option<&Book> {
        self.results.all.iter().find(|book| book.id == id)
    }
}
