use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;

use clap::Parser;
use log::{debug, info, LevelFilter};
use thiserror::Error;

use crate::config::{self, ConfigError};
use crate::contract::SearchHandoff;
use crate::controller::{Completion, MountedSearchControl, SearchController};
use crate::core_service::{SearchService, ServiceError};
use crate::document::{Document, PointerEvent, Region};
use crate::logging;
use crate::model::SearchResultPayload;
use crate::navigation::{Navigator, Route};
use crate::results_view::ResultsView;
use crate::ticket::SearchTicket;
use crate::transport;

const BIN_NAME: &str = "furqaan-search-core";

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Search Elmul Furqaan blogs, videos and Q&A from the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = BIN_NAME, version)]
pub struct CliOptions {
    /// Config file (TOML, or JSON5 for .json/.json5 paths).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend base URL; wins over the config file and FURQAAN_API_URL.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Print a JSON envelope instead of the rendered page (one-shot mode).
    #[arg(long)]
    pub json: bool,

    /// Level written to the log file.
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Search once for this term and exit. Starts the interactive prompt when omitted.
    pub query: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    SearchFailed,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, clap::Error> {
    CliOptions::try_parse_from(std::iter::once(BIN_NAME.to_string()).chain(args.iter().cloned()))
}

pub fn run_with_options(options: CliOptions) -> Result<RunOutcome, RuntimeError> {
    if let Err(error) = logging::init(options.log_level) {
        eprintln!("[furqaan-search] file logging unavailable: {error}");
    }

    let mut config = config::load(options.config.as_deref())?;
    if options.api_url.is_some() {
        config::apply_api_url_override(&mut config, options.api_url.clone());
        config::validate(&config)?;
    }
    info!(
        "startup api={} config_path={} suggestion_limit={}",
        config.api_base_url,
        config.config_path.display(),
        config.suggestion_limit
    );

    let service = SearchService::new(config)?;
    let query = options.query.join(" ");
    if !query.trim().is_empty() {
        return run_once(&service, &query, options.json);
    }

    run_interactive(service);
    Ok(RunOutcome::Completed)
}

fn run_once(service: &SearchService, term: &str, json: bool) -> Result<RunOutcome, RuntimeError> {
    if json {
        let response = transport::handle_search(service, term);
        println!("{}", transport::to_json(&response)?);
        return Ok(if response.is_ok() {
            RunOutcome::Completed
        } else {
            RunOutcome::SearchFailed
        });
    }

    match service.search(term) {
        Ok(payload) => {
            let view = service.results_view(Some(SearchHandoff::new(term.trim(), payload)));
            print!("{}", view.render());
            Ok(RunOutcome::Completed)
        }
        Err(error) => {
            eprintln!("[furqaan-search] search failed: {error}");
            Ok(RunOutcome::SearchFailed)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Input(String),
    Submit,
    Pick(usize),
    Escape,
    Back,
    Forward,
    Retry(Option<String>),
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Submit;
    }
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Input(line.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts
        .next()
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string);

    match name {
        "q" | "quit" => Command::Quit,
        "esc" => Command::Escape,
        "back" => Command::Back,
        "forward" => Command::Forward,
        "retry" => Command::Retry(arg),
        _ => match name.parse::<usize>() {
            Ok(index) if index > 0 => Command::Pick(index),
            _ => Command::Unknown(name.to_string()),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletionTarget {
    Control,
    ResultsView,
}

enum RuntimeEvent {
    Line(String),
    InputClosed,
    Completed {
        target: CompletionTarget,
        ticket: SearchTicket,
        result: Result<SearchResultPayload, ServiceError>,
    },
}

struct Session {
    service: SearchService,
    events: Sender<RuntimeEvent>,
    document: Document,
    control: MountedSearchControl,
    navigator: Navigator,
    view: Option<ResultsView>,
    last_term: Option<String>,
}

fn run_interactive(service: SearchService) {
    let (events, inbox) = mpsc::channel();
    spawn_stdin_reader(events.clone());

    let document = Document::new();
    let control = MountedSearchControl::mount(&document, service.controller());
    let mut session = Session {
        service,
        events,
        document,
        control,
        navigator: Navigator::default(),
        view: None,
        last_term: None,
    };

    println!("[furqaan-search] type to search; empty line submits, :N picks a suggestion, :esc, :back, :forward, :retry [term], :quit");

    for event in inbox {
        let keep_running = match event {
            RuntimeEvent::Line(line) => session.on_command(parse_command(&line)),
            RuntimeEvent::Completed {
                target,
                ticket,
                result,
            } => {
                session.on_completed(target, ticket, result);
                true
            }
            RuntimeEvent::InputClosed => false,
        };
        if !keep_running {
            break;
        }
    }

    let _ = session.control.unmount();
    info!("interactive session closed");
}

impl Session {
    fn on_command(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Input(text) => {
                self.control.controller_mut().on_input(&text);
                print_suggestions(&self.control.controller());
            }
            Command::Submit => {
                let ticket = self.control.controller_mut().submit();
                self.dispatch(CompletionTarget::Control, ticket);
            }
            Command::Pick(index) => {
                let ticket = self.control.controller_mut().select_suggestion(index - 1);
                self.dispatch(CompletionTarget::Control, ticket);
            }
            Command::Escape => {
                if self.control.controller_mut().on_escape() {
                    println!("[furqaan-search] suggestions hidden");
                }
            }
            Command::Back | Command::Forward => {
                self.document
                    .dispatch_pointer(&PointerEvent::at(Region::Elsewhere));
                let moved = if command == Command::Back {
                    self.navigator.back()
                } else {
                    self.navigator.forward()
                };
                if moved {
                    self.show_current_route();
                } else {
                    println!("[furqaan-search] no history entry in that direction");
                }
            }
            Command::Retry(term) => {
                self.document
                    .dispatch_pointer(&PointerEvent::at(Region::Elsewhere));
                self.retry(term);
            }
            Command::Unknown(name) => {
                println!("[furqaan-search] unknown command ':{name}'");
            }
        }
        true
    }

    fn retry(&mut self, term: Option<String>) {
        if self.navigator.current() != &Route::Search {
            self.navigator.navigate(Route::Search, None);
            self.show_current_route();
        }

        let Some(view) = self.view.as_mut() else {
            return;
        };
        let term = term
            .or_else(|| view.term().map(str::to_string))
            .or_else(|| self.last_term.clone());
        let Some(term) = term else {
            println!("[furqaan-search] nothing to retry; pass a term with :retry <term>");
            return;
        };

        if let Some(ticket) = view.reenter(&term) {
            print!("{}", view.render());
            spawn_search(&self.service, &self.events, CompletionTarget::ResultsView, ticket);
        }
    }

    fn dispatch(&mut self, target: CompletionTarget, ticket: Option<SearchTicket>) {
        match ticket {
            Some(ticket) => {
                println!("[furqaan-search] searching for \"{}\"...", ticket.term());
                spawn_search(&self.service, &self.events, target, ticket);
            }
            None => println!("[furqaan-search] type a query first"),
        }
    }

    fn on_completed(
        &mut self,
        target: CompletionTarget,
        ticket: SearchTicket,
        result: Result<SearchResultPayload, ServiceError>,
    ) {
        match target {
            CompletionTarget::Control => {
                let completion = self.control.controller_mut().complete(ticket, result);
                match completion {
                    Completion::HandedOff(handoff) => {
                        self.last_term = Some(handoff.search_term.clone());
                        self.navigator.navigate(Route::Search, Some(handoff));
                        self.show_current_route();
                    }
                    Completion::Failed(message) => println!("[furqaan-search] {message}"),
                    Completion::Stale => debug!("ignored stale completion"),
                }
            }
            CompletionTarget::ResultsView => {
                let Some(view) = self.view.as_mut() else {
                    return;
                };
                if view.resolve(ticket, result) {
                    print!("{}", view.render());
                }
            }
        }
    }

    fn show_current_route(&mut self) {
        let route = self.navigator.current().clone();
        if route == Route::Search {
            let view = self.service.results_view(self.navigator.take_state());
            print!("{}", view.render());
            self.view = Some(view);
        } else {
            println!("[furqaan-search] at {}", route.path());
            self.view = None;
        }
    }
}

fn print_suggestions(controller: &SearchController) {
    for (index, suggestion) in controller.suggestions().iter().enumerate() {
        println!("  {}. {suggestion}", index + 1);
    }
}

fn spawn_stdin_reader(events: Sender<RuntimeEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if events.send(RuntimeEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = events.send(RuntimeEvent::InputClosed);
    });
}

fn spawn_search(
    service: &SearchService,
    events: &Sender<RuntimeEvent>,
    target: CompletionTarget,
    ticket: SearchTicket,
) {
    let service = service.clone();
    let events = events.clone();
    thread::spawn(move || {
        let result = service.search(ticket.term());
        let _ = events.send(RuntimeEvent::Completed {
            target,
            ticket,
            result,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_one_shot_query_words() {
        let options = parse_cli_args(&args(&["--json", "Islamic", "History"])).unwrap();
        assert!(options.json);
        assert_eq!(options.query, vec!["Islamic", "History"]);
        assert_eq!(options.log_level, LevelFilter::Info);
    }

    #[test]
    fn parses_api_url_and_config() {
        let options = parse_cli_args(&args(&[
            "--api-url",
            "https://api.example.org",
            "--config",
            "custom.json5",
        ]))
        .unwrap();
        assert_eq!(options.api_url.as_deref(), Some("https://api.example.org"));
        assert_eq!(options.config, Some(PathBuf::from("custom.json5")));
        assert!(options.query.is_empty());
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(parse_cli_args(&args(&["--nope"])).is_err());
    }

    #[test]
    fn parses_interactive_commands() {
        assert_eq!(parse_command(""), Command::Submit);
        assert_eq!(parse_command("   "), Command::Submit);
        assert_eq!(parse_command("Qur"), Command::Input("Qur".into()));
        assert_eq!(parse_command(":2"), Command::Pick(2));
        assert_eq!(parse_command(":0"), Command::Unknown("0".into()));
        assert_eq!(parse_command(":esc"), Command::Escape);
        assert_eq!(parse_command(":retry  Zakat "), Command::Retry(Some("Zakat".into())));
        assert_eq!(parse_command(":retry"), Command::Retry(None));
        assert_eq!(parse_command(":quit"), Command::Quit);
    }
}
