//! userdeck - a terminal user directory
//!
//! This is the main entry point for the userdeck application.
//! Widgets are self-contained components mounted onto a host page.

use anyhow::Result;
use crossterm::event::Event;
use std::time::Duration;
use userdeck::action::Action;
use userdeck::app::App;
use userdeck::config::Config;
use userdeck::logging;
use userdeck::tui::Tui;

fn main() -> Result<()> {
    let config = match Config::load() {
        Some(config) => config,
        None => {
            let config = Config::default();
            // A read-only home directory is not fatal
            let _ = config.save();
            config
        }
    };
    if let Err(err) = logging::init(&config) {
        eprintln!("Warning: logging disabled: {:#}", err);
    }

    let mut app = App::new(config.clone())?;

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(config.tick_rate_ms));
    tui.enter()?;

    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = %format!("{:#}", err), "application error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    let (width, height) = tui.size()?;
    app.dispatch(Action::Resize(width, height))?;
    app.init()?;

    while !app.should_quit {
        let mut draw_result = Ok(());
        tui.draw(|frame| draw_result = app.draw(frame))?;
        draw_result?;

        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Mouse(mouse)) => app.handle_mouse_event(mouse)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            Some(_) => None,
            // No event - send a tick for time-based updates
            None => Some(Action::Tick),
        };

        if let Some(action) = action {
            app.dispatch(action)?;
        }
    }

    Ok(())
}
