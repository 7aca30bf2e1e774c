mod app;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod gateway;
mod input;
mod model;
mod resolve;
#[cfg(test)]
mod testing;
mod ui;

use anyhow::{Context, Result};
use app::{App, AppEvent};
use clap::{CommandFactory, Parser};
use cli::{CliArgs, Mode};
use client::ProtectClient;
use commands::ListKind;
use config::Config;
use crossterm::event::{
    Event, EventStream, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use futures::StreamExt;
use gateway::RemoteGateway;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    config.apply_overrides(
        args.url.as_deref(),
        args.token.as_deref(),
        args.log_level.as_deref(),
    );
    let mode = args.mode();
    init_tracing(config.tracing_directive(), mode == Mode::Tui)?;
    config.validate().context("invalid configuration")?;

    let client = ProtectClient::new(&config.protect_url, &config.api_token)?;
    debug!("using controller at {}", client.base_url());

    let mut stdout = io::stdout();
    match mode {
        Mode::Tui => {
            let (tx, rx) = mpsc::unbounded_channel();
            let gateway = RemoteGateway::new(Arc::new(client), tx);
            let mut app = App::new();
            run(&mut app, &gateway, rx).await
        }
        Mode::List { kind, show_ids } => {
            let kind = kind.parse::<ListKind>()?;
            commands::list(&client, kind, show_ids, &mut stdout).await
        }
        Mode::Switch { port, view } => {
            commands::switch_viewport(&client, &port, &view, &mut stdout).await
        }
        Mode::Camera { camera, preset } => {
            commands::move_camera(&client, &camera, preset, &mut stdout).await
        }
        Mode::Help => CliArgs::command()
            .print_help()
            .context("failed to print help"),
    }
}

fn init_tracing(directive: &str, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .or_else(|_| EnvFilter::try_new("off"))
        .context("failed to initialize tracing filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    // the TUI owns the terminal, so its logs go nowhere
    let _ = if interactive {
        builder.with_writer(io::sink).try_init()
    } else {
        builder.with_writer(io::stderr).try_init()
    };

    Ok(())
}

async fn run<B: client::ProtectBackend>(
    app: &mut App,
    gateway: &RemoteGateway<B>,
    events: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let (mut terminal, keyboard_enhanced) = init_terminal()?;
    let run_result = run_loop(&mut terminal, app, gateway, events).await;
    let restore_result = restore_terminal(&mut terminal, keyboard_enhanced);

    match (run_result, restore_result) {
        (Err(run_error), Err(restore_error)) => Err(anyhow::anyhow!(
            "{run_error:#}\nterminal restore error: {restore_error:#}"
        )),
        (Err(error), _) => Err(error),
        (_, Err(error)) => Err(error),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn init_terminal() -> Result<(TuiTerminal, bool)> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if keyboard_enhanced {
        execute!(
            stdout,
            EnterAlternateScreen,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .context("failed to enter alternate screen with keyboard enhancement")?;
    } else {
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().context("failed to clear terminal")?;
    Ok((terminal, keyboard_enhanced))
}

fn restore_terminal(terminal: &mut TuiTerminal, keyboard_enhanced: bool) -> Result<()> {
    if keyboard_enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("failed to pop keyboard enhancement flags")?;
    }
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Processes one event at a time: keys from the terminal, completions from
/// the gateway's tasks. Each resulting command is launched before the next
/// frame is drawn.
async fn run_loop<B: client::ProtectBackend>(
    terminal: &mut TuiTerminal,
    app: &mut App,
    gateway: &RemoteGateway<B>,
    mut events: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut reader = EventStream::new();

    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("failed to render terminal frame")?;

        if app.quitting() {
            break;
        }

        let event = tokio::select! {
            maybe_event = reader.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        match input::map_key(key) {
                            Some(action) => AppEvent::Input(action),
                            None => continue,
                        }
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(error)) => {
                        app.report_error(format!("terminal event error: {error}"));
                        continue;
                    }
                    None => {
                        info!("terminal event stream closed");
                        break;
                    }
                }
            }
            maybe_completion = events.recv() => {
                match maybe_completion {
                    Some(event) => event,
                    None => break,
                }
            }
        };

        debug!("event={event:?}");
        let command = app.handle_event(event);
        if let Err(error) = gateway.launch(command) {
            app.report_error(error);
        }
    }

    Ok(())
}
