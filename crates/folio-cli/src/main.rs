mod highlight;
mod logging;
mod ui;

use std::env;
use std::sync::Arc;

use folio_chat::ChatBackend;
use folio_chat::ChatError;
use folio_chat::ChatRequest;
use folio_chat::GeminiClient;
use folio_chat::GeminiSettings;
use folio_core::config::ChatConfig;
use folio_core::config::Config;
use folio_core::persistence::PreferenceStore;
use folio_core::persistence::Preferences;
use folio_core::state::FolioState;
use folio_core::terminal::TerminalState;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        return run_tui();
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("folio {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "exec" => {
            let line = args.collect::<Vec<_>>().join(" ");
            if let Some(output) = exec_line(&load_config()?, &line)? {
                println!("{output}");
            }
            Ok(())
        }
        _ => {
            print_help();
            Err(format!("unknown command: {command}").into())
        }
    }
}

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    match Config::default_path() {
        Some(path) => Ok(Config::load(&path)?),
        None => Ok(Config::default()),
    }
}

/// Runs one line through a fresh session; `None` when the line prints nothing.
fn exec_line(config: &Config, line: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut terminal = TerminalState::new(config.terminal.identity(), config.terminal.max_sessions);
    let id = terminal.create_session()?;
    Ok(terminal.run_line(id, line).and_then(|outcome| outcome.output))
}

fn run_tui() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = logging::default_log_path() {
        if !logging::init_global(&path) {
            eprintln!("warning: could not open log file {}", path.display());
        }
    }
    let config = load_config()?;
    tracing::info!(model = %config.chat.model, "starting folio");

    let store = match PreferenceStore::default_path() {
        Some(path) => match PreferenceStore::open(&path) {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "preferences disabled");
                None
            }
        },
        None => None,
    };
    let prefs = store
        .as_ref()
        .map(PreferenceStore::load)
        .unwrap_or_else(Preferences::default);

    let state = FolioState::new(&config, &prefs);
    let app = ui::App::new(state, store, chat_backend(&config.chat));
    ui::run(app)
}

fn chat_settings(chat: &ChatConfig) -> GeminiSettings {
    GeminiSettings {
        api_key: chat.api_key(),
        key_source: format!("{} or API_KEY", chat.api_key_env),
        endpoint: chat.endpoint.clone(),
        model: chat.model.clone(),
        temperature: chat.temperature,
        timeout: chat.timeout(),
        assistant_name: chat.assistant_name.clone(),
    }
}

/// Stands in for the Gemini client when it could not be built.
struct UnavailableBackend(ChatError);

impl ChatBackend for UnavailableBackend {
    fn complete(&self, _request: &ChatRequest) -> Result<String, ChatError> {
        Err(self.0.clone())
    }
}

fn chat_backend(chat: &ChatConfig) -> Arc<dyn ChatBackend> {
    match GeminiClient::new(chat_settings(chat)) {
        Ok(client) => {
            tracing::info!(model = client.model(), "chat backend ready");
            Arc::new(client)
        }
        Err(err) => {
            tracing::warn!(%err, "chat backend unavailable");
            Arc::new(UnavailableBackend(err))
        }
    }
}

fn print_help() {
    println!("folio {}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  folio                   launch the portfolio workspace");
    println!("  folio exec COMMAND...   run one terminal command and print its output");
    println!("  folio --help");
    println!("  folio --version");
}
