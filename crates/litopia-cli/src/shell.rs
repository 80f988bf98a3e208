//! Line-oriented browsing: one fetch, then page around and save books.

use anyhow::Result;
use litopia_books::{BookSource, Session};
use litopia_core::{FilterState, KeyValueStore, RenderSink, SortKey};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

const HELP: &str = "\
Commands:
  n, next            next page
  p, prev            previous page
  <number>           jump to page
  add <id>           save a book to your library
  search <text>      new keyword (refetches)
  sort <key|none>    newest, oldest, titleAZ, titleZA, ratingHighLow, ratingLowHigh
  retry              repeat the last fetch
  reset              clear all filters
  count              library size
  q, quit            leave";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Next,
    Prev,
    Goto(usize),
    Add(String),
    Search(String),
    Sort(Option<SortKey>),
    Retry,
    Reset,
    Count,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(h, r)| (h, r.trim()));

    match head {
        "n" | "next" => Ok(Command::Next),
        "p" | "prev" => Ok(Command::Prev),
        "add" if !rest.is_empty() => Ok(Command::Add(rest.to_string())),
        "add" => Err("usage: add <id>".to_string()),
        "search" => Ok(Command::Search(rest.to_string())),
        "sort" if rest.is_empty() || rest == "none" => Ok(Command::Sort(None)),
        "sort" => rest.parse().map(|key| Command::Sort(Some(key))),
        "retry" => Ok(Command::Retry),
        "reset" => Ok(Command::Reset),
        "count" => Ok(Command::Count),
        "help" | "?" | "" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|page| *page >= 1)
            .map(Command::Goto)
            .ok_or_else(|| format!("unknown command '{other}' (type 'help')")),
    }
}

pub async fn run<S: BookSource, K: KeyValueStore>(
    session: &mut Session<S, K>,
    initial: FilterState,
    sink: &mut dyn RenderSink,
) -> Result<()> {
    session.show_library_count(sink);
    session.apply_filters(initial, sink).await;
    eprintln!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            Command::Next => {
                if !session.next_page(sink) {
                    eprintln!("Already on the last page.");
                }
            }
            Command::Prev => {
                if !session.prev_page(sink) {
                    eprintln!("Already on the first page.");
                }
            }
            Command::Goto(page) => {
                if !session.goto_page(page, sink) {
                    eprintln!(
                        "No page {page}; pages run 1-{}.",
                        session.catalog().total_pages()
                    );
                }
            }
            Command::Add(id) => {
                if let Err(e) = session.add_to_library(&id, sink).await {
                    error!(id = %id, error = %e, "could not add to library");
                }
            }
            Command::Search(keyword) => {
                let filters = FilterState {
                    keyword,
                    ..session.catalog().filters().clone()
                };
                session.apply_filters(filters, sink).await;
            }
            Command::Sort(sort) => {
                let filters = FilterState {
                    sort,
                    ..session.catalog().filters().clone()
                };
                session.apply_filters(filters, sink).await;
            }
            Command::Retry => {
                session.retry(sink).await;
            }
            Command::Reset => {
                session.reset(sink).await;
            }
            Command::Count => session.show_library_count(sink),
            Command::Help => eprintln!("{HELP}"),
            Command::Quit => break,
        }
    }
    Ok(())
}
