//! Searchbox: debounced search box with a result dropdown
//!
//! Usage:
//!   searchbox                      - Open the search window
//!   searchbox open [SOURCE]        - Open the search window on SOURCE
//!   searchbox query <text>         - Print matches for <text> and exit
//!   searchbox check [SOURCE]       - Fetch the result set once and report
//!   searchbox help                 - Show help

mod app;
mod backend;
mod config;
mod ui;
mod widget;

use std::collections::VecDeque;
use std::env;
use std::sync::Arc;

use app::SearchBox;
use backend::api::SourceClient;
use backend::types::SearchResult;
use config::Config;
use iced::{window, Size};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use widget::{Effect, Input, Panel, SearchWidget};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn main() -> iced::Result {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 {
        return handle_cli_command(&args[1], &args[2..]);
    }

    start_window(exit_on_error(load_config(None)))
}

fn handle_cli_command(cmd: &str, rest: &[String]) -> iced::Result {
    match cmd {
        "open" | "run" => {
            let config = exit_on_error(load_config(rest.first().map(String::as_str)));
            start_window(config)
        }
        "query" | "q" => {
            let (words, source) = split_source_flag(rest);
            let lines = exit_on_error(
                load_config(source).and_then(|config| search_once(&config, &words.join(" "))),
            );
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        "check" | "status" => {
            let config = exit_on_error(load_config(rest.first().map(String::as_str)));
            let client = exit_on_error(source_client(&config));
            let count = exit_on_error(fetch_count(&client));
            println!("{}: {} entries", client.source(), count);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("Searchbox - debounced search over a JSON result set\n");
            println!("Usage: searchbox [command]\n");
            println!("Commands:");
            println!("  (none)                     Open the search window");
            println!("  open [SOURCE]              Open the search window on SOURCE");
            println!("  query <text> [--source S]  Print matches for <text>");
            println!("  check [SOURCE]             Fetch the result set once and report");
            println!("  help                       Show this help message");
            println!("\nSOURCE is an http(s) URL or a path to a JSON file.");
            println!("Defaults come from the config file and {}.", config::SOURCE_ENV);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run 'searchbox help' for usage");
            std::process::exit(2);
        }
    }
}

/// Print the error and exit with status 1
fn exit_on_error<T>(result: CliResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Pull `--source <value>` out of the arguments
fn split_source_flag(args: &[String]) -> (Vec<&str>, Option<&str>) {
    let mut words = Vec::new();
    let mut source = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--source" {
            source = iter.next().map(String::as_str);
        } else {
            words.push(arg.as_str());
        }
    }
    (words, source)
}

fn load_config(source: Option<&str>) -> CliResult<Config> {
    let mut config = Config::load()?;
    if let Some(source) = source {
        config.set_source(source);
    }
    Ok(config)
}

fn source_client(config: &Config) -> CliResult<SourceClient> {
    Ok(SourceClient::new(config.data_source()?))
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| format!("failed to create tokio runtime: {}", e).into())
}

fn format_row(result: &SearchResult) -> String {
    format!("{} - {} ({})", result.phrase, result.subtext, result.url)
}

/// One-shot search through the widget core, without the debounce wait.
///
/// Returns the lines the dropdown would show. A failed fetch is an error
/// here rather than a "no matches" line.
fn search_once(config: &Config, text: &str) -> CliResult<Vec<String>> {
    let client = source_client(config)?;
    let rt = runtime()?;

    let mut widget = SearchWidget::new(config.timings());
    let mut failure = None;
    let mut queue: VecDeque<Effect> = widget.handle(Input::TextChanged(text.to_string())).into();
    while let Some(effect) = queue.pop_front() {
        let next = match effect {
            Effect::StartTimer { id, .. } => widget.handle(Input::TimerFired(id)),
            Effect::Fetch { request, .. } => {
                let outcome = rt.block_on(client.fetch_matches()).map_err(Arc::new);
                if let Err(e) = &outcome {
                    failure = Some(Arc::clone(e));
                }
                widget.handle(Input::FetchCompleted { request, outcome })
            }
            _ => Vec::new(),
        };
        queue.extend(next);
    }

    if let Some(e) = failure {
        return Err(e.into());
    }

    let lines = match widget.panel() {
        Panel::Results(rows) => rows.iter().map(|row| format_row(&row.result)).collect(),
        panel => vec![panel.message().unwrap_or_default().to_string()],
    };
    Ok(lines)
}

fn fetch_count(client: &SourceClient) -> CliResult<usize> {
    let rt = runtime()?;
    let entries = rt.block_on(client.fetch_matches())?;
    Ok(entries.len())
}

fn start_window(config: Config) -> iced::Result {
    let client = exit_on_error(source_client(&config));
    let timings = config.timings();

    tracing::info!("Starting searchbox...");

    iced::application("Searchbox", SearchBox::update, SearchBox::view)
        .subscription(SearchBox::subscription)
        .theme(SearchBox::theme)
        .window(window::Settings {
            size: Size::new(config.window_width, config.window_height),
            position: window::Position::Centered,
            resizable: true,
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || SearchBox::new(client, timings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_source_flag() {
        let args: Vec<String> = ["red", "--source", "data.json", "fox"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (words, source) = split_source_flag(&args);
        assert_eq!(words, ["red", "fox"]);
        assert_eq!(source, Some("data.json"));
    }

    #[test]
    fn test_split_without_flag() {
        let args = vec!["red".to_string()];
        let (words, source) = split_source_flag(&args);
        assert_eq!(words, ["red"]);
        assert!(source.is_none());
    }

    fn config_with(contents: &str) -> (tempfile::NamedTempFile, Config) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, contents.as_bytes()).unwrap();
        let config = Config {
            source: file.path().to_string_lossy().to_string(),
            ..Config::default()
        };
        (file, config)
    }

    const DATASET: &str = r#"{"success": true, "best_matches": [
        {"phrase": "Red Fox", "subtext": "animal", "url": "a.com"},
        {"phrase": "Red Car", "subtext": "vehicle", "url": "b.com"}
    ]}"#;

    #[test]
    fn test_search_once_prints_rows() {
        let (_file, config) = config_with(DATASET);
        let lines = search_once(&config, "red").unwrap();
        assert_eq!(
            lines,
            ["Red Fox - animal (a.com)", "Red Car - vehicle (b.com)"]
        );
    }

    #[test]
    fn test_search_once_messages() {
        let (_file, config) = config_with(DATASET);
        assert_eq!(search_once(&config, "zzz").unwrap(), ["No matches found for your query"]);
        assert_eq!(search_once(&config, "  ").unwrap(), ["What is your query?"]);
    }

    #[test]
    fn test_search_once_fails_on_bad_source() {
        let (_file, config) = config_with(r#"{"success": false}"#);
        assert!(search_once(&config, "red").is_err());

        let missing = Config {
            source: "/nonexistent/searchbox/temp.json".to_string(),
            ..Config::default()
        };
        assert!(search_once(&missing, "red").is_err());
    }

    #[test]
    fn test_fetch_count() {
        let (_file, config) = config_with(DATASET);
        let client = source_client(&config).unwrap();
        assert_eq!(fetch_count(&client).unwrap(), 2);

        let (_bad, config) = config_with("not json");
        let client = source_client(&config).unwrap();
        assert!(fetch_count(&client).is_err());
    }
}
