//! Control flow for one user session: build request → fetch → normalize →
//! filter/sort → paginate → render, with the library alongside.

use litopia_core::{
    AddOutcome, Catalog, FilterForm, FilterState, KeyValueStore, LibraryStore, LitopiaError,
    RenderSink,
};
use tracing::{debug, error, info};

use crate::sources::BookSource;

pub struct Session<S, K> {
    source: S,
    catalog: Catalog,
    library: LibraryStore<K>,
}

impl<S: BookSource, K: KeyValueStore> Session<S, K> {
    pub fn new(source: S, catalog: Catalog, library: LibraryStore<K>) -> Self {
        Self {
            source,
            catalog,
            library,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn library(&self) -> &LibraryStore<K> {
        &self.library
    }

    /// Fetch for the current filters and redraw. Returns whether the fetch
    /// succeeded; a failure is shown through the sink, never returned.
    pub async fn load(&mut self, sink: &mut dyn RenderSink) -> bool {
        let (ticket, request) = self.catalog.begin_fetch();
        self.catalog.render(sink);

        info!(source = self.source.name(), query = %request.query, "loading books");
        let outcome = self
            .source
            .search(&request)
            .await
            .map_err(LitopiaError::from);
        let ok = outcome.is_ok();
        if let Err(e) = &outcome {
            error!(error = %e, "failed to load books");
        }

        if self.catalog.finish_fetch(ticket, outcome) {
            self.catalog.render(sink);
        }
        ok
    }

    /// Same request again, e.g. from the error view.
    pub async fn retry(&mut self, sink: &mut dyn RenderSink) -> bool {
        self.load(sink).await
    }

    pub async fn apply_form(&mut self, form: &FilterForm, sink: &mut dyn RenderSink) -> bool {
        self.catalog.apply_form(form);
        self.load(sink).await
    }

    pub async fn apply_filters(&mut self, filters: FilterState, sink: &mut dyn RenderSink) -> bool {
        self.catalog.set_filters(filters);
        self.load(sink).await
    }

    pub async fn reset(&mut self, sink: &mut dyn RenderSink) -> bool {
        self.catalog.reset();
        self.load(sink).await
    }

    // ─── Paging: re-slice only ─────────────────────────────

    pub fn next_page(&mut self, sink: &mut dyn RenderSink) -> bool {
        let moved = self.catalog.next_page();
        if moved {
            self.catalog.render(sink);
        }
        moved
    }

    pub fn prev_page(&mut self, sink: &mut dyn RenderSink) -> bool {
        let moved = self.catalog.prev_page();
        if moved {
            self.catalog.render(sink);
        }
        moved
    }

    /// Jump to a typed page number. Anything outside `1..=total_pages` is
    /// refused and nothing is rendered.
    pub fn goto_page(&mut self, page: usize, sink: &mut dyn RenderSink) -> bool {
        if !(1..=self.catalog.total_pages()).contains(&page) {
            debug!(page, total = self.catalog.total_pages(), "page out of range");
            return false;
        }
        self.catalog.goto_page(page);
        self.catalog.render(sink);
        true
    }

    // ─── Library ───────────────────────────────────────────

    pub fn show_library_count(&self, sink: &mut dyn RenderSink) {
        sink.library_count(self.library.count());
    }

    /// Save a book by id. Books from the last fetch are used as shown; any
    /// other id is looked up at the source first.
    pub async fn add_to_library(
        &mut self,
        id: &str,
        sink: &mut dyn RenderSink,
    ) -> litopia_core::Result<AddOutcome> {
        let book = match self.catalog.find_book(id) {
            Some(book) => book.clone(),
            None => {
                debug!(id, "book not in current results, fetching");
                let raw = self.source.fetch_volume(id).await?;
                self.catalog.normalize(&raw)
            }
        };

        let outcome = self.library.add(&book);
        sink.library_added(&book, outcome);
        if outcome == AddOutcome::Added {
            sink.library_count(self.library.count());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use litopia_core::{
        Book, FETCH_FAILED_MESSAGE, MemoryStore, Normalizer, PageView, Paginator, QueryBuilder,
        RatingPlaceholder, RawVolume, SearchRequest, SortKey, VolumeInfo,
    };
    use mockito::{Matcher, Server};

    use super::*;
    use crate::error::{Result, SourceError};
    use crate::sources::google_books::GoogleBooksSource;

    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<RawVolume>>>>,
        requests: Mutex<Vec<SearchRequest>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<RawVolume>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BookSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(&self, request: &SearchRequest) -> Result<Vec<RawVolume>> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_volume(&self, id: &str) -> Result<RawVolume> {
            if id == "remote" {
                Ok(volume("remote", "Remote Book", 2010))
            } else {
                Err(SourceError::NotFound(id.to_string()))
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RenderSink for Recorder {
        fn loading(&mut self) {
            self.events.push("loading".into());
        }
        fn page(&mut self, view: &PageView<'_>) {
            let ids: Vec<&str> = view.items.iter().map(|b| b.id.as_str()).collect();
            self.events.push(format!(
                "page {}/{} [{}] of {}",
                view.current_page,
                view.total_pages,
                ids.join(","),
                view.total_count
            ));
        }
        fn error(&mut self, message: &str) {
            self.events.push(format!("error: {message}"));
        }
        fn library_count(&mut self, count: usize) {
            self.events.push(format!("count {count}"));
        }
        fn library_added(&mut self, book: &Book, outcome: AddOutcome) {
            self.events.push(format!("added {} {outcome:?}", book.id));
        }
    }

    fn volume(id: &str, title: &str, year: i32) -> RawVolume {
        RawVolume {
            id: id.to_string(),
            volume_info: Some(VolumeInfo {
                title: Some(title.to_string()),
                published_date: Some(year.to_string()),
                page_count: Some(200),
                average_rating: Some(4.0),
                ..Default::default()
            }),
        }
    }

    fn volumes(n: usize) -> Vec<RawVolume> {
        (0..n)
            .map(|i| volume(&format!("b{i}"), &format!("Book {i}"), 2000 + i as i32))
            .collect()
    }

    fn catalog() -> Catalog {
        Catalog::with_parts(
            QueryBuilder::default(),
            Paginator::default(),
            Normalizer::with_seed(RatingPlaceholder::PerFetch, 11),
        )
    }

    fn session<S: BookSource>(source: S) -> Session<S, MemoryStore> {
        Session::new(source, catalog(), LibraryStore::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_load_renders_loading_then_page() {
        let mut s = session(ScriptedSource::new(vec![Ok(volumes(8))]));
        let mut sink = Recorder::default();

        assert!(s.load(&mut sink).await);
        assert_eq!(
            sink.events,
            ["loading", "page 1/2 [b0,b1,b2,b3,b4,b5] of 8"]
        );
    }

    #[tokio::test]
    async fn test_paging_does_not_refetch() {
        let source = ScriptedSource::new(vec![Ok(volumes(8))]);
        let mut s = session(source);
        let mut sink = Recorder::default();
        s.load(&mut sink).await;
        sink.events.clear();

        assert!(!s.prev_page(&mut sink));
        assert!(s.next_page(&mut sink));
        assert!(!s.next_page(&mut sink));
        assert!(s.goto_page(1, &mut sink));

        assert_eq!(
            sink.events,
            ["page 2/2 [b6,b7] of 8", "page 1/2 [b0,b1,b2,b3,b4,b5] of 8"]
        );
        assert_eq!(s.source.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_goto_page_out_of_range_is_refused() {
        let mut s = session(ScriptedSource::new(vec![Ok(volumes(13))]));
        let mut sink = Recorder::default();
        s.load(&mut sink).await;
        assert!(s.next_page(&mut sink));
        sink.events.clear();

        assert!(!s.goto_page(99, &mut sink));
        assert!(!s.goto_page(0, &mut sink));
        assert!(sink.events.is_empty());
        assert_eq!(s.catalog().filters().current_page, 2);

        assert!(s.goto_page(3, &mut sink));
        assert_eq!(sink.events, ["page 3/3 [b12] of 13"]);
    }

    #[tokio::test]
    async fn test_goto_page_before_any_results_is_refused() {
        let mut s = session(ScriptedSource::new(vec![Ok(Vec::new())]));
        let mut sink = Recorder::default();
        s.load(&mut sink).await;
        sink.events.clear();

        assert!(!s.goto_page(1, &mut sink));
        assert!(sink.events.is_empty());
    }

    #[tokio::test]
    async fn test_apply_form_refetches_with_new_query() {
        let mut s = session(ScriptedSource::new(vec![Ok(volumes(3)), Ok(volumes(8))]));
        let mut sink = Recorder::default();
        s.load(&mut sink).await;

        let form = FilterForm {
            keyword: "pramoedya".into(),
            sort: "newest".into(),
            year_from: "2004".into(),
            ..Default::default()
        };
        assert!(s.apply_form(&form, &mut sink).await);

        let requests = s.source.requests.lock().unwrap();
        assert_eq!(requests[0].query, "bestseller");
        assert_eq!(requests[1].query, "pramoedya");
        drop(requests);

        assert_eq!(s.catalog().filters().sort, Some(SortKey::Newest));
        assert_eq!(sink.events.last().unwrap(), "page 1/1 [b7,b6,b5,b4] of 4");
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let mut s = session(ScriptedSource::new(vec![Ok(volumes(2)), Ok(volumes(2))]));
        let mut sink = Recorder::default();
        s.apply_filters(
            FilterState {
                keyword: "x".into(),
                year_to: Some(1),
                ..Default::default()
            },
            &mut sink,
        )
        .await;
        assert!(s.catalog().results().filtered.is_empty());

        s.reset(&mut sink).await;
        assert_eq!(s.catalog().filters(), &FilterState::default());
        assert_eq!(s.catalog().results().filtered.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_clears_and_shows_error_then_retry_recovers() {
        let mut s = session(ScriptedSource::new(vec![
            Ok(volumes(4)),
            Err(SourceError::ApiError("googlebooks".into(), "HTTP 500".into())),
            Ok(volumes(1)),
        ]));
        let mut sink = Recorder::default();
        s.load(&mut sink).await;
        sink.events.clear();

        assert!(!s.load(&mut sink).await);
        assert!(s.catalog().results().all.is_empty());
        assert!(s.catalog().results().filtered.is_empty());
        assert_eq!(
            sink.events,
            ["loading".to_string(), format!("error: {FETCH_FAILED_MESSAGE}")]
        );

        assert!(s.retry(&mut sink).await);
        assert_eq!(s.catalog().results().all.len(), 1);
    }

    #[tokio::test]
    async fn test_add_to_library_from_results_and_duplicate() {
        let mut s = session(ScriptedSource::new(vec![Ok(volumes(3))]));
        let mut sink = Recorder::default();
        s.load(&mut sink).await;
        sink.events.clear();

        let first = s.add_to_library("b1", &mut sink).await.unwrap();
        let second = s.add_to_library("b1", &mut sink).await.unwrap();
        assert_eq!(first, AddOutcome::Added);
        assert_eq!(second, AddOutcome::AlreadyPresent);
        assert_eq!(s.library().count(), 1);
        assert_eq!(
            sink.events,
            ["added b1 Added", "count 1", "added b1 AlreadyPresent"]
        );
    }

    #[tokio::test]
    async fn test_add_to_library_fetches_unknown_id() {
        let mut s = session(ScriptedSource::new(vec![]));
        let mut sink = Recorder::default();

        let outcome = s.add_to_library("remote", &mut sink).await.unwrap();
        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(s.library().entries()[0].title, "Remote Book");

        let err = s.add_to_library("ghost", &mut sink).await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(s.library().count(), 1);
    }

    #[tokio::test]
    async fn test_http_failure_end_to_end() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/volumes")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("backend error")
            .create_async()
            .await;

        let source =
            GoogleBooksSource::with_params(&server.url(), Duration::from_millis(1), 0, "litopia-test")
                .unwrap();
        let mut s = session(source);
        let mut sink = Recorder::default();

        assert!(!s.load(&mut sink).await);
        assert!(s.catalog().results().all.is_empty());
        assert!(s.catalog().results().filtered.is_empty());
        assert_eq!(
            sink.events.last().unwrap(),
            &format!("error: {FETCH_FAILED_MESSAGE}")
        );
    }

    #[tokio::test]
    async fn test_http_success_end_to_end() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/volumes")
            .match_query(Matcher::UrlEncoded("q".into(), "bestseller".into()))
            .with_status(200)
            .with_body(
                r#"{"items": [
                    {"id": "a", "volumeInfo": {"title": "Ronggeng Dukuh Paruk",
                        "categories": ["Fiction"], "publishedDate": "1982"}},
                    {"id": "b", "volumeInfo": {"title": "Filosofi Teras",
                        "categories": ["Self-Help"], "publishedDate": "2018-11"}}
                ]}"#,
            )
            .create_async()
            .await;

        let source =
            GoogleBooksSource::with_params(&server.url(), Duration::from_millis(1), 0, "litopia-test")
                .unwrap();
        let mut s = session(source);
        let mut sink = Recorder::default();

        assert!(s.load(&mut sink).await);
        let books = &s.catalog().results().all;
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].genre.label(), "Fiksi");
        assert_eq!(books[1].year, 2018);
        assert!(books[0].rating_is_placeholder);
    }
}
