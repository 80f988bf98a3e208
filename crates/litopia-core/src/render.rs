//! Presentation seam. Sinks only ever see plain data.

use crate::models::{AddOutcome, Book};
use crate::paginate::PageView;

/// Something that can draw the catalog: a terminal, a JSON stream, a DOM.
pub trait RenderSink {
    /// A fetch is in flight.
    fn loading(&mut self);

    /// The current page of the grid. `view.items` may be empty.
    fn page(&mut self, view: &PageView<'_>);

    /// The last fetch failed; the sink should offer a retry.
    fn error(&mut self, message: &str);

    fn library_count(&mut self, count: usize);

    fn library_added(&mut self, book: &Book, outcome: AddOutcome);
}

/// Snapshot of what the catalog currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView<'a> {
    /// Nothing fetched yet.
    Idle,
    Loading,
    Page(PageView<'a>),
    Failed(&'a str),
}

impl CatalogView<'_> {
    pub fn render_to(&self, sink: &mut dyn RenderSink) {
        match self {
            Self::Idle => {}
            Self::Loading => sink.loading(),
            Self::Page(view) => sink.page(view),
            Self::Failed(message) => sink.error(message),
        }
    }
}
