use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::{Mutex, Arc};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use newslens_core::auth::{AuthBus, AuthSignal, CredentialHolder, CredentialStore, ProcessAuthBus};
use newslens_core::session::{Session, SessionController, TabLoadState};
use newslens_infrastructure::FileTokenStorage;
use newslens_interaction::{ApiConfig, AuthApiClient, InsightsApiClient, SearchTermsApiClient};

const COMMANDS: &[&str] = &[
    "/login", "/register", "/search", "/tabs", "/tab", "/close", "/saved", "/open", "/unsave",
    "/logout", "/help", "/quit",
];

/// newslens - search a topic, read AI-generated insights, keep your
/// favorite search terms at hand.
#[derive(Parser)]
#[command(name = "newslens")]
#[command(about = "Session-aware client for the News AI insights service", long_about = None)]
struct Cli {
    /// Backend base URL (overrides NEWSLENS_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// In-memory fallback used when the config directory cannot be resolved:
/// the session still works, the token just does not survive a restart.
struct EphemeralTokenStore {
    token: Mutex<Option<String>>,
}

impl CredentialStore for EphemeralTokenStore {
    fn load(&self) -> newslens_core::error::Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn store(&self, token: &str) -> newslens_core::error::Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> newslens_core::error::Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "newslens=debug" } else { "newslens=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.base_url {
        Some(url) => ApiConfig::new(url),
        None => ApiConfig::from_env(),
    };

    // ===== Backend wiring =====
    let token_store: Arc<dyn CredentialStore> = match FileTokenStorage::new() {
        Ok(storage) => Arc::new(storage),
        Err(err) => {
            tracing::warn!("token file unavailable, session will not persist: {err}");
            Arc::new(EphemeralTokenStore {
                token: Mutex::new(None),
            })
        }
    };
    let credentials = Arc::new(CredentialHolder::new(token_store));
    let auth_bus: Arc<dyn AuthBus> = Arc::new(ProcessAuthBus::new());
    let auth_client = AuthApiClient::new(config.clone());
    let insights = Arc::new(InsightsApiClient::new(config.clone(), credentials.clone()));
    let search_terms = Arc::new(SearchTermsApiClient::new(config, credentials.clone()));

    let controller = SessionController::new(
        credentials.clone(),
        insights,
        search_terms,
        auth_bus.clone(),
    );
    controller.start();
    controller.flush_pending().await;

    println!("{}", "newslens - News AI insights".bold());
    if controller.snapshot().is_authenticated {
        println!("{}", "Restored previous session.".green());
    } else {
        println!("Not logged in. Use {} to sign in.", "/login <username> <password>".bright_cyan());
    }
    println!("Type a topic to search, or {} for commands.", "/help".bright_cyan());

    let mut editor: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(CliHelper::new()));

    loop {
        let prompt = format!("{} ", "newslens>".bright_blue());
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());

                if !handle_line(&line, &controller, &auth_client, &credentials, &*auth_bus).await {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{} {err}", "readline error:".red());
                break;
            }
        }
    }

    controller.detach();
    println!("Bye.");
    Ok(())
}

/// Dispatches one input line. Returns `false` when the user quits.
async fn handle_line(
    line: &str,
    controller: &Arc<SessionController>,
    auth_client: &AuthApiClient,
    credentials: &Arc<CredentialHolder>,
    auth_bus: &dyn AuthBus,
) -> bool {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();

    match command {
        "/quit" | "/exit" => return false,
        "/help" => print_help(),
        "/login" => {
            let (Some(username), Some(password)) = (parts.next(), parts.next()) else {
                println!("Usage: /login <username> <password>");
                return true;
            };
            match auth_client.login(username, password).await {
                Ok(token) => {
                    credentials.set(token.access_token);
                    auth_bus.emit(AuthSignal::Login);
                    controller.flush_pending().await;
                    println!("{}", "Logged in.".green());
                }
                Err(err) => println!("{} {err}", "Login failed:".red()),
            }
        }
        "/register" => {
            let (Some(email), Some(username), Some(password)) =
                (parts.next(), parts.next(), parts.next())
            else {
                println!("Usage: /register <email> <username> <password>");
                return true;
            };
            match auth_client.register(email, username, password).await {
                Ok(token) => {
                    credentials.set(token.access_token);
                    auth_bus.emit(AuthSignal::Login);
                    controller.flush_pending().await;
                    println!("{}", "Registered and logged in.".green());
                }
                Err(err) => println!("{} {err}", "Registration failed:".red()),
            }
        }
        "/logout" => {
            controller.log_out();
            println!("{}", "Logged out.".green());
        }
        "/search" => {
            let term = line.trim_start_matches("/search").trim();
            submit_search(controller, term).await;
        }
        "/tabs" => print_tabs(&controller.snapshot()),
        "/tab" => match parts.next().and_then(|raw| raw.parse::<u64>().ok()) {
            Some(id) if controller.activate_tab(id) => {
                print_active_tab(&controller.snapshot());
            }
            Some(id) => println!("No tab {id}."),
            None => println!("Usage: /tab <id>"),
        },
        "/close" => {
            let session = controller.snapshot();
            let target = match parts.next() {
                Some(raw) => raw.parse::<u64>().ok(),
                None => session.active_tab_id,
            };
            match target {
                Some(id) if controller.close_tab(id) => print_tabs(&controller.snapshot()),
                Some(id) => println!("No tab {id}."),
                None => println!("No open tab to close."),
            }
        }
        "/saved" => print_saved(&controller.snapshot()),
        "/open" => match resolve_saved_index(controller, parts.next()) {
            Some(term) => {
                controller.activate_saved(&term);
                controller.flush_pending().await;
                print_active_tab(&controller.snapshot());
            }
            None => println!("Usage: /open <number>   (see /saved)"),
        },
        "/unsave" => {
            let Some(id) = resolve_saved_id(controller, parts.next()) else {
                println!("Usage: /unsave <number>   (see /saved)");
                return true;
            };
            match controller.remove_saved(&id).await {
                Ok(()) => println!("{}", "Removed saved search.".green()),
                Err(err) => println!("{} {err}", "Could not remove saved search:".red()),
            }
        }
        _ if command.starts_with('/') => {
            println!("Unknown command {command}. Try {}.", "/help".bright_cyan());
        }
        // Plain text is a search.
        _ => submit_search(controller, line).await,
    }

    true
}

async fn submit_search(controller: &Arc<SessionController>, term: &str) {
    match controller.submit_search(term) {
        Some(_) => {
            controller.flush_pending().await;
            print_active_tab(&controller.snapshot());
        }
        None => println!("Nothing to search for."),
    }
}

fn resolve_saved_index(controller: &Arc<SessionController>, raw: Option<&str>) -> Option<String> {
    let index = raw?.parse::<usize>().ok()?.checked_sub(1)?;
    let session = controller.snapshot();
    session
        .saved_searches
        .get(index)
        .map(|saved| saved.term.clone())
}

fn resolve_saved_id(controller: &Arc<SessionController>, raw: Option<&str>) -> Option<String> {
    let index = raw?.parse::<usize>().ok()?.checked_sub(1)?;
    let session = controller.snapshot();
    session
        .saved_searches
        .get(index)
        .map(|saved| saved.id.clone())
}

fn print_help() {
    println!("  {:28} search a topic (or just type it)", "/search <topic>".bright_cyan());
    println!("  {:28} list open tabs", "/tabs".bright_cyan());
    println!("  {:28} switch to a tab", "/tab <id>".bright_cyan());
    println!("  {:28} close the active (or given) tab", "/close [id]".bright_cyan());
    println!("  {:28} list saved searches", "/saved".bright_cyan());
    println!("  {:28} re-run a saved search", "/open <number>".bright_cyan());
    println!("  {:28} delete a saved search", "/unsave <number>".bright_cyan());
    println!("  {:28} sign in", "/login <username> <password>".bright_cyan());
    println!("  {:28} create an account", "/register <email> <user> <pass>".bright_cyan());
    println!("  {:28} sign out and clear the session", "/logout".bright_cyan());
    println!("  {:28} leave", "/quit".bright_cyan());
}

fn load_state_marker(state: TabLoadState) -> colored::ColoredString {
    match state {
        TabLoadState::Loading => "loading".yellow(),
        TabLoadState::Ready => "ready".green(),
        TabLoadState::Failed => "failed".red(),
    }
}

fn print_tabs(session: &Session) {
    if session.tabs.is_empty() {
        println!("No open tabs.");
        return;
    }
    for tab in &session.tabs {
        let marker = if session.active_tab_id == Some(tab.id) { "*" } else { " " };
        println!(
            "{} [{}] {} ({})",
            marker,
            tab.id,
            tab.search_term.bold(),
            load_state_marker(tab.load_state),
        );
    }
}

fn print_active_tab(session: &Session) {
    let Some(tab) = session.active_tab() else {
        println!("No active tab.");
        return;
    };

    println!("{} ({})", tab.search_term.bold(), load_state_marker(tab.load_state));
    match tab.load_state {
        TabLoadState::Failed => {
            if let Some(message) = &tab.error_message {
                println!("  {}", message.red());
            }
        }
        _ if tab.insights.is_empty() => println!("  No insights."),
        _ => {
            for (i, insight) in tab.insights.iter().enumerate() {
                println!("  {}. {}", i + 1, insight.text);
                println!("     {} {}", insight.source_title.dimmed(), insight.source_link.dimmed());
            }
        }
    }
}

fn print_saved(session: &Session) {
    if session.is_loading_saved_searches {
        println!("{}", "Loading saved searches...".yellow());
        return;
    }
    if session.saved_searches.is_empty() {
        println!("No saved searches.");
        return;
    }
    for (i, saved) in session.saved_searches.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            saved.term.bold(),
            saved.created_at.format("(%Y-%m-%d)").to_string().dimmed(),
        );
    }
}
