//! Terminal UI for trashday that looks up the holiday-adjusted trash pick-up day.

mod app;
mod config;
mod input;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::{Result, bail};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::info;
use trashday_core::{plugin::PluginRegistry, service::TrashDayService};
use trashday_provider_kcmo as kcmo;

use crate::app::{App, Lookup, error_text, headline};
use crate::config::Arguments;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    config::init_logging(args.log_file.as_ref())?;

    // HTTP + service setup
    let client = Client::builder().user_agent("trashday/0.1").build()?;

    let plugins = vec![kcmo::plugin(client, args.geocode_api_key.clone())];
    let registry = Arc::new(PluginRegistry::new(plugins));
    let service = Arc::new(TrashDayService::new(registry));

    // App state
    let mut app = App::new(service, args.today, args.coordinates());
    let initial_lookup = initial_lookup(&args, &mut app);
    info!(?initial_lookup, today = %app.today(), "starting trashday");

    if args.print {
        let Some(lookup) = initial_lookup else {
            bail!("--print needs --latitude and --longitude or --address");
        };
        return print_once(&app, lookup).await;
    }

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, initial_lookup).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn initial_lookup(args: &Arguments, app: &mut App) -> Option<Lookup> {
    if let Some(address) = &args.address {
        app.address_input.clone_from(address);
        return Some(Lookup::Address(address.clone()));
    }
    args.coordinates().map(Lookup::Location)
}

#[expect(
    clippy::print_stdout,
    reason = "--print writes its single result to stdout"
)]
async fn print_once(app: &App, lookup: Lookup) -> Result<()> {
    match app.lookup(lookup).await {
        Ok(report) => {
            println!("{}", headline(&report));
            Ok(())
        }
        Err(err) => bail!(error_text(&err)),
    }
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    initial_lookup: Option<Lookup>,
) -> Result<()> {
    if let Some(lookup) = initial_lookup {
        perform(terminal, &mut app, lookup).await?;
    }

    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::LookupAddress => {
                    let address = app.address_input.trim().to_owned();
                    if address.is_empty() {
                        app.error_message = Some("Type a street address, then press Enter".into());
                        continue;
                    }
                    perform(terminal, &mut app, Lookup::Address(address)).await?;
                }
                Action::LookupLocation => {
                    let Some(coordinates) = app.coordinates else {
                        app.error_message = Some(
                            "No location configured (start with --latitude and --longitude)"
                                .into(),
                        );
                        continue;
                    };
                    perform(terminal, &mut app, Lookup::Location(coordinates)).await?;
                }
            }
        }
    }

    Ok(())
}

async fn perform(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    lookup: Lookup,
) -> Result<()> {
    app.is_loading = true;
    app.error_message = None;
    terminal.draw(|frame| ui::draw(frame, app))?;

    let res = app.lookup(lookup).await;
    app.apply(res);
    Ok(())
}
