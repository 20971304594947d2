use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use redeem_binder::config::Config;
use redeem_binder::page::Page;
use redeem_binder::prompt::Prompter;
use redeem_binder::services::HttpCodeApi;
use redeem_binder::widget::WidgetKind;

const HELP: &str = "\
commands:
  account | guard     switch section
  code <text>         type a code into the active section
  validate            validate the active section
  game <id>           choose a game in the active section
  bind                request the binding
  delete <code>       delete a binding (asks first)
  show                print the page
  quit";

type InputLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// Confirmations and alerts on the terminal, reading answers from the same
/// stdin as the command loop.
struct TerminalPrompter {
    lines: InputLines,
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, message: &str) -> bool {
        println!("{message} [y/N]");
        let answer = self.lines.lock().await.next_line().await;
        matches!(answer, Ok(Some(line)) if line.trim().eq_ignore_ascii_case("y"))
    }

    async fn alert(&self, message: &str) {
        println!("! {message}");
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Section(WidgetKind),
    Code(String),
    Validate,
    Game(String),
    Bind,
    Delete(String),
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(h, r)| (h, r.trim()));

    match head {
        "account" => Some(Command::Section(WidgetKind::Account)),
        "guard" => Some(Command::Section(WidgetKind::Guard)),
        "code" => Some(Command::Code(rest.to_string())),
        "validate" => Some(Command::Validate),
        "game" => Some(Command::Game(rest.to_string())),
        "bind" | "request" => Some(Command::Bind),
        "delete" if !rest.is_empty() => Some(Command::Delete(rest.to_string())),
        "show" => Some(Command::Show),
        "help" | "?" => Some(Command::Help),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize structured logging
    init_tracing(&config.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        api_base_url = %config.api_base_url,
        "Starting Redeem Binder"
    );

    let api = Arc::new(HttpCodeApi::new(&config.api_base_url));
    let mut page = Page::new(api);

    let lines: InputLines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let prompter = TerminalPrompter {
        lines: Arc::clone(&lines),
    };

    println!("{HELP}");
    loop {
        let next = lines.lock().await.next_line().await?;
        let Some(line) = next else { break };
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = parse_command(&line) else {
            println!("unknown command, try `help`");
            continue;
        };

        let active = page.active();
        match command {
            Command::Section(kind) => page.show_section(kind),
            Command::Code(text) => page.set_input(active, &text),
            Command::Validate => {
                page.validate(active).await;
            }
            Command::Game(game) => {
                if !page.select_game(active, &game) {
                    println!("game selection is locked");
                }
            }
            Command::Bind => {
                page.request_bind(active, &prompter).await;
            }
            Command::Delete(code) => {
                page.delete_binding(&code, &prompter).await;
            }
            Command::Show => {}
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        }
        print_page(&page);
    }

    Ok(())
}

fn print_page(page: &Page) {
    let view = page.render();
    let active = if view.active == WidgetKind::Account {
        &view.account
    } else {
        &view.guard
    };
    println!("{active}");
    println!("{}", view.result);
}

/// Initialize the `tracing` subscriber with an environment-based filter.
///
/// Logs go to stderr so they do not interleave with the page output.
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("redeem_binder={log_level},reqwest=warn").into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
