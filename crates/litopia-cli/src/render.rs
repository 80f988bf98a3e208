use litopia_core::{AddOutcome, Book, PageView, RenderSink};
use serde_json::json;

// ─── Terminal ────────────────────────────────────────────────────────────────

/// Plain-text grid for humans.
#[derive(Default)]
pub struct TerminalSink {
    /// Hint printed under an error, e.g. how to retry.
    pub retry_hint: Option<&'static str>,
}

impl TerminalSink {
    pub fn new(retry_hint: Option<&'static str>) -> Self {
        Self { retry_hint }
    }
}

impl RenderSink for TerminalSink {
    fn loading(&mut self) {
        eprintln!("Loading books from Google Books...");
    }

    fn page(&mut self, view: &PageView<'_>) {
        if view.items.is_empty() {
            println!("No books found. Try a different filter.");
            println!("Showing 0 books");
            return;
        }

        println!("Showing {} books", view.total_count);
        println!();
        for book in view.items {
            print_card(book);
        }
        println!("{}", pager_line(view));
    }

    fn error(&mut self, message: &str) {
        eprintln!("Error: {message}");
        if let Some(hint) = self.retry_hint {
            eprintln!("{hint}");
        }
    }

    fn library_count(&mut self, count: usize) {
        println!("Library: {count} books");
    }

    fn library_added(&mut self, book: &Book, outcome: AddOutcome) {
        match outcome {
            AddOutcome::Added => println!("Added to library: {} ({})", book.title, book.id),
            AddOutcome::AlreadyPresent => println!("Already in library: {}", book.title),
        }
    }
}

fn print_card(book: &Book) {
    let guessed = if book.rating_is_placeholder { "~" } else { "" };
    println!("  {}", book.title);
    println!("    {} · {}", book.author, book.genre);
    println!(
        "    {:<5} ({guessed}{:.1})",
        "*".repeat(book.stars()),
        book.rating
    );
    if book.year != 0 {
        println!("    Year: {}", book.year);
    }
    if book.pages != 0 {
        println!("    Pages: {}", book.pages);
    }
    if !book.publisher.is_empty() {
        println!("    Publisher: {}", book.publisher);
    }
    println!("    id: {}", book.id);
    println!();
}

/// `‹ 1 [2] 3 ›` with disabled arrows left out.
pub fn pager_line(view: &PageView<'_>) -> String {
    let mut parts = Vec::with_capacity(view.window.len() + 2);
    parts.push(if view.has_prev { "‹" } else { " " }.to_string());
    for &page in &view.window {
        if page == view.current_page {
            parts.push(format!("[{page}]"));
        } else {
            parts.push(page.to_string());
        }
    }
    parts.push(if view.has_next { "›" } else { " " }.to_string());
    format!("Page {}/{}   {}", view.current_page, view.total_pages, parts.join(" "))
}

// ─── JSON ────────────────────────────────────────────────────────────────────

/// One JSON object per line, for scripts.
#[derive(Default)]
pub struct JsonSink;

impl JsonSink {
    fn emit(value: serde_json::Value) {
        println!("{value}");
    }
}

impl RenderSink for JsonSink {
    fn loading(&mut self) {
        Self::emit(json!({"status": "loading"}));
    }

    fn page(&mut self, view: &PageView<'_>) {
        Self::emit(json!({"status": "ok", "event": "page", "data": view}));
    }

    fn error(&mut self, message: &str) {
        Self::emit(json!({"status": "error", "error": "network", "message": message, "retryable": true}));
    }

    fn library_count(&mut self, count: usize) {
        Self::emit(json!({"status": "ok", "event": "library_count", "data": {"count": count}}));
    }

    fn library_added(&mut self, book: &Book, outcome: AddOutcome) {
        Self::emit(json!({
            "status": "ok",
            "event": "library_added",
            "data": {"id": book.id, "title": book.title, "outcome": outcome}
        }));
    }
}

// ─── Hold ────────────────────────────────────────────────────────────────────

/// Forwards everything except pages. Used while a page other than the
/// first is still to be selected.
pub struct HoldPages<'a>(pub &'a mut dyn RenderSink);

impl RenderSink for HoldPages<'_> {
    fn loading(&mut self) {
        self.0.loading();
    }

    fn page(&mut self, _view: &PageView<'_>) {}

    fn error(&mut self, message: &str) {
        self.0.error(message);
    }

    fn library_count(&mut self, count: usize) {
        self.0.library_count(count);
    }

    fn library_added(&mut self, book: &Book, outcome: AddOutcome) {
        self.0.library_added(book, outcome);
    }
}
