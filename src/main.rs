use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use promptsmith::{dispatcher, handler, logging, tui, ui, App, Config, GenerationEvent};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging is best-effort; the app still runs without it
    let _logging = match logging::init() {
        Ok(ctx) => {
            info!(log_directory = %ctx.log_directory.display(), "logging to file");
            Some(ctx)
        }
        Err(e) => {
            eprintln!("warning: file logging disabled: {:#}", e);
            None
        }
    };

    let config = load_config();
    info!(
        model = %config.model,
        api_url = %config.api_url,
        api_key_configured = config.has_api_key(),
        "config loaded"
    );

    let (events_tx, mut events_rx) = dispatcher::event_channel();
    let mut app = App::new(&config, events_tx)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app, &mut events_rx).await;

    tui::restore()?;

    match &result {
        Ok(()) => info!("session_end"),
        Err(e) => error!(error = %e, "exited with error"),
    }
    result
}

fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "failed to load config file, using defaults");
        Config::new().with_env_overrides(|key| std::env::var(key).ok())
    })
}

/// Draw, then wait for whichever comes first: terminal input or a worker result.
async fn run(
    terminal: &mut tui::Tui,
    app: &mut App,
    generation_events: &mut mpsc::Receiver<GenerationEvent>,
) -> Result<()> {
    let mut terminal_events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            Some(event) = terminal_events.next() => handler::handle_event(app, event),
            Some(event) = generation_events.recv() => app.apply_event(event),
            else => break,
        }
    }

    Ok(())
}
