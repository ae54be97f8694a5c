pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod resilience;
pub mod telemetry;
pub mod ui;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use app::events::{AppEvent, spawn_input_task};
use app::state::{AppMode, AppState};
use cli::Cli;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use data::client::GimClient;
use domain::{AvailabilityIndex, calendar::default_range_now, normalize};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    telemetry::init(cli.log_file.as_deref())?;
    info!(api = %cli.api_url, "starting gim-viewer");

    if cli.one_shot {
        return run_one_shot(&cli).await;
    }

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, cli).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_inner(terminal: &mut Terminal<CrosstermBackend<Stdout>>, cli: Cli) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);
    let mut app = AppState::new(&cli);

    tx.send(AppEvent::Bootstrap).await?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx, &cli).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx, &cli).await?;
                }
            }
        }

        terminal.draw(|frame| ui::render(frame, &app))?;

        if app.mode == AppMode::Quit {
            app.running = false;
        }
    }

    Ok(())
}

/// Non-interactive path: resolve a model, print its availability and the
/// normalized metrics table, then exit.
async fn run_one_shot(cli: &Cli) -> Result<()> {
    let client = GimClient::with_base_url(cli.api_url.clone());
    let models = client.models().await?;
    let model = match &cli.model {
        Some(code) => models
            .into_iter()
            .find(|model| &model.code == code)
            .with_context(|| format!("unknown model {code}"))?,
        None => models
            .into_iter()
            .next()
            .context("the server lists no forecast models")?,
    };

    let interval = cli.explicit_range()?.unwrap_or_else(default_range_now);
    let index = AvailabilityIndex::build(client.forecasts(&model.code).await?);
    let raw = client.metrics(&model.code, Some(interval)).await?;
    let series = normalize(&raw, interval);

    print!("{}", ui::report::render_report(&model, &index, interval, &series));
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
        existing(panic);
    }));
}
