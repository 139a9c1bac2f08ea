//! Terminal host for the translation store.
//!
//! Loads translations from a workspace, mounts a language switcher and a
//! label panel, then reads commands from stdin.

use std::path::PathBuf;
use std::process::ExitCode;

use i18n_store::config::ConfigManager;
use i18n_store::indexer::LocaleIndexer;
use i18n_store::store::{
    self,
    Binding,
    RedrawRequests,
    TranslatedLabels,
    TranslationStore,
};
use i18n_store::view::LanguageSwitcher;
use tokio::io::{
    AsyncBufReadExt,
    AsyncWriteExt,
    BufReader,
};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the stored language preference.
const PREFERENCE_ENV: &str = "I18N_STORE_LANG";
/// Environment variable holding an `Accept-Language` style hint list.
const ACCEPT_LANGUAGE_ENV: &str = "I18N_STORE_ACCEPT_LANGUAGE";

#[tokio::main]
async fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("I18N_STORE_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the workspace and serves stdin commands until EOF or `quit`.
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let workspace_root = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(workspace_root.clone()))?;
    let settings = config_manager.into_settings();

    let table = LocaleIndexer::new().index(&workspace_root, &settings).await?;

    let preferred = std::env::var(PREFERENCE_ENV).ok();
    let hints = locale_hints();
    let store = store::build_store(table, preferred.as_deref(), &hints, &settings)?;
    store::global::install(store.clone())?;

    let mut keys: Vec<String> = store
        .dictionary()
        .get(store.current_language().as_str())
        .map(|map| map.keys().map(str::to_string).collect())
        .unwrap_or_default();
    keys.sort();

    let redraws = RedrawRequests::new();
    let mut switcher = Binding::mount(&store, LanguageSwitcher::new(), redraws.clone());
    let mut labels = Binding::mount(&store, TranslatedLabels::new(keys), redraws.clone());

    let mut stdout = tokio::io::stdout();
    stdout.write_all(paint(&mut switcher, &mut labels).as_bytes()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let reply = match Command::parse(&line) {
            Command::Quit => break,
            Command::Empty => continue,
            Command::Use(code) => {
                if switcher.component().select(&store, code) {
                    String::new()
                } else {
                    format!("unknown language: {code}\n")
                }
            }
            Command::List => list_languages(&store),
            Command::Translate(key) => format!("{}\n", store.translate(key)),
            Command::Help => HELP.to_string(),
            Command::Unknown(word) => format!("unknown command: {word} (try 'help')\n"),
        };

        let mut output = reply;
        if redraws.take() > 0 {
            output.push_str(&paint(&mut switcher, &mut labels));
        }
        stdout.write_all(output.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Reply to `help`.
const HELP: &str = "\
commands:
  list          show available languages
  use <code>    switch language
  t <key>       translate a key
  quit          exit
";

/// A parsed stdin line
enum Command<'a> {
    /// Blank line
    Empty,
    /// `quit` / `exit`
    Quit,
    /// `help`
    Help,
    /// `list` / `ls`
    List,
    /// `use <code>`
    Use(&'a str),
    /// `t <key>`
    Translate(&'a str),
    /// Anything else
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parses the first two words of `line`.
    fn parse(line: &'a str) -> Self {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (None, _) => Self::Empty,
            (Some("quit" | "exit"), _) => Self::Quit,
            (Some("help"), _) => Self::Help,
            (Some("list" | "ls"), _) => Self::List,
            (Some("use"), Some(code)) => Self::Use(code),
            (Some("t"), Some(key)) => Self::Translate(key),
            (Some(word), _) => Self::Unknown(word),
        }
    }
}

/// Renders both bindings.
fn paint(
    switcher: &mut Binding<LanguageSwitcher>,
    labels: &mut Binding<TranslatedLabels>,
) -> String {
    let mut out = format!("{}\n", switcher.render());
    for (key, text) in labels.render() {
        out.push_str(&format!("  {key} = {text}\n"));
    }
    out
}

/// One line per language, the active one marked with `*`.
fn list_languages(store: &TranslationStore) -> String {
    let current = store.current_language();
    store
        .available_languages()
        .iter()
        .map(|info| {
            let marker = if info.code == current { '*' } else { ' ' };
            format!("{marker} {} ({})\n", info.code, info.display_name)
        })
        .collect()
}

/// Locale hints from `I18N_STORE_ACCEPT_LANGUAGE` and `LANG` (`tr_TR.UTF-8` → `tr_TR`).
fn locale_hints() -> Vec<String> {
    let mut hints = std::env::var(ACCEPT_LANGUAGE_ENV)
        .map(|header| store::parse_accept_language(&header))
        .unwrap_or_default();

    if let Ok(lang) = std::env::var("LANG")
        && let Some(tag) = lang.split('.').next()
        && !tag.is_empty()
        && tag != "C"
        && tag != "POSIX"
    {
        hints.push(tag.to_string());
    }
    hints
}
