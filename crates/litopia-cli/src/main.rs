mod render;
mod shell;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use litopia_books::{GoogleBooksSource, Session};
use litopia_core::error::ExitCode;
use litopia_core::{
    AddOutcome, AppConfig, Catalog, FilterState, JsonFileStore, LibraryStore, RenderSink, SortKey,
    split_genres,
};

use crate::render::{HoldPages, JsonSink, TerminalSink};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "litopia",
    about = "Browse Google Books and keep a reading list",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output JSON lines (for scripts). Also enabled by LITOPIA_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once and print one page of results.
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
        /// Page to show (1-based).
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Fetch, then page through results interactively.
    Shell {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Saved books.
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Default, Clone)]
struct FilterArgs {
    /// Search text; "bestseller" when omitted.
    #[arg(long, short)]
    keyword: Option<String>,
    /// newest, oldest, titleAZ, titleZA, ratingHighLow, ratingLowHigh
    #[arg(long)]
    sort: Option<SortKey>,
    /// Genre filter, repeatable or comma-separated: fiksi, nonfiksi, romance,
    /// thriller, selfhelp, bisnis.
    #[arg(long = "genre", action = clap::ArgAction::Append)]
    genres: Vec<String>,
    #[arg(long)]
    year_from: Option<i32>,
    #[arg(long)]
    year_to: Option<i32>,
    #[arg(long)]
    pages_from: Option<u32>,
    #[arg(long)]
    pages_to: Option<u32>,
}

impl FilterArgs {
    /// Zero bounds count as unset, like blank inputs.
    fn into_state(self) -> FilterState {
        FilterState {
            keyword: self.keyword.unwrap_or_default().trim().to_string(),
            sort: self.sort,
            genres: split_genres(&self.genres.join(",")),
            year_from: self.year_from.filter(|v| *v != 0),
            year_to: self.year_to.filter(|v| *v != 0),
            page_from: self.pages_from.filter(|v| *v != 0),
            page_to: self.pages_to.filter(|v| *v != 0),
            current_page: 1,
        }
    }
}

#[derive(Subcommand)]
enum LibraryAction {
    /// Save a book by its Google Books id.
    Add { id: String },
    /// List saved books.
    List,
    /// Number of saved books.
    Count,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config.
    Show,
    /// Print the config file path.
    Path,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("LITOPIA_JSON").as_deref() == Ok("1");
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Browse { filters, page } => {
            let mut sink = make_sink(json_output, Some("Run the command again to retry."));
            let mut session = open_session(&config)?;

            session.show_library_count(sink.as_mut());
            let ok = if page > 1 {
                let ok = session
                    .apply_filters(filters.into_state(), &mut HoldPages(sink.as_mut()))
                    .await;
                if ok && !session.goto_page(page, sink.as_mut()) {
                    let total = session.catalog().total_pages();
                    error!(page, total, "page out of range");
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "error",
                            "error": "invalid_args",
                            "message": format!("page {page} out of range (1-{total})")
                        }))?;
                    }
                    std::process::exit(ExitCode::InvalidArgs as i32);
                }
                ok
            } else {
                session.apply_filters(filters.into_state(), sink.as_mut()).await
            };

            if !ok {
                std::process::exit(ExitCode::NetworkError as i32);
            }
        }

        Commands::Shell { filters } => {
            let mut sink = make_sink(json_output, Some("Type 'retry' to try again."));
            let mut session = open_session(&config)?;
            shell::run(&mut session, filters.into_state(), sink.as_mut()).await?;
        }

        Commands::Library { action } => match action {
            LibraryAction::Add { id } => {
                let mut sink = make_sink(json_output, None);
                let mut session = open_session(&config)?;
                match session.add_to_library(&id, sink.as_mut()).await {
                    Ok(AddOutcome::Added) => {}
                    Ok(AddOutcome::AlreadyPresent) => {
                        std::process::exit(ExitCode::Conflict as i32);
                    }
                    Err(e) => {
                        if json_output {
                            print_json(&serde_json::json!({
                                "status": "error",
                                "error": "network",
                                "message": e.to_string()
                            }))?;
                        } else {
                            error!(id = %id, error = %e, "could not add to library");
                        }
                        std::process::exit(ExitCode::NetworkError as i32);
                    }
                }
            }

            LibraryAction::List => {
                let library = open_library(&config);
                let entries = library.entries();
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": { "items": entries, "total": entries.len() }
                    }))?;
                } else if entries.is_empty() {
                    println!("Your library is empty. Use `litopia library add <id>` to save books.");
                } else {
                    for entry in &entries {
                        println!(
                            "{id:<14}  {title:<40}  {author:<25}  {genre}",
                            id = entry.id,
                            title = entry.title,
                            author = entry.author,
                            genre = entry.genre,
                        );
                    }
                }
            }

            LibraryAction::Count => {
                let mut sink = make_sink(json_output, None);
                sink.library_count(open_library(&config).count());
            }
        },

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::to_value(&config)?)?;
                } else {
                    print!("{}", config.to_toml()?);
                }
            }
            ConfigAction::Path => println!("{}", AppConfig::config_path().display()),
        },
    }

    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn make_sink(json_output: bool, retry_hint: Option<&'static str>) -> Box<dyn RenderSink> {
    if json_output {
        Box::new(JsonSink)
    } else {
        Box::new(TerminalSink::new(retry_hint))
    }
}

fn open_library(config: &AppConfig) -> LibraryStore<JsonFileStore> {
    LibraryStore::with_key(
        JsonFileStore::new(config.store_path()),
        config.storage.library_key.clone(),
    )
}

fn open_session(config: &AppConfig) -> Result<Session<GoogleBooksSource, JsonFileStore>> {
    let source = GoogleBooksSource::new(&config.api)?;
    Ok(Session::new(source, Catalog::new(config), open_library(config)))
}

/// One object per line, matching the sink's stream.
fn json_line(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", json_line(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_browse_filters() {
        let cli = Cli::try_parse_from([
            "litopia", "browse", "-k", "laskar pelangi", "--sort", "titleAZ", "--genre",
            "fiksi,romance", "--genre", "bisnis", "--year-from", "2000", "--pages-to", "0",
            "--page", "2",
        ])
        .unwrap();

        let Commands::Browse { filters, page } = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(page, 2);
        let state = filters.into_state();
        assert_eq!(state.keyword, "laskar pelangi");
        assert_eq!(state.sort, Some(SortKey::TitleAz));
        assert_eq!(state.genres, ["fiksi", "romance", "bisnis"]);
        assert_eq!(state.year_from, Some(2000));
        assert_eq!(state.page_to, None);
    }

    #[test]
    fn test_json_output_is_single_line() {
        let value = serde_json::json!({
            "status": "ok",
            "data": { "items": [{"id": "a"}, {"id": "b"}], "total": 2 }
        });
        let line = json_line(&value).unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(serde_json::from_str::<serde_json::Value>(&line).unwrap(), value);
    }

    #[test]
    fn test_cli_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["litopia", "browse", "--sort", "popular"]).is_err());
    }

    #[test]
    fn test_cli_library_add() {
        let cli = Cli::try_parse_from(["litopia", "--json", "library", "add", "abc"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Library { action: LibraryAction::Add { id } } if id == "abc"
        ));
    }
}
