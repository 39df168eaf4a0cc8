use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io::stdout;

mod app;
mod config;
mod error;
mod notification;
mod search;

use app::App;
use error::TypeaheadError;
use search::client::SearchClient;
use search::worker;

/// Interactive typeahead search picker
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Interactive search picker with debounced, cancellable remote queries"
)]
struct Args {
    /// Search endpoint URL (overrides the configured endpoint)
    endpoint: Option<String>,
}

fn main() -> Result<()> {
    // Writes to /tmp/typeahead-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    {
        use std::io::Write;

        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/typeahead-debug.log")
            .expect("Failed to open /tmp/typeahead-debug.log");

        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .format(|buf, record| {
                use std::time::SystemTime;
                let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
                writeln!(
                    buf,
                    "[{}] [{}] {}",
                    datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            })
            .init();

        log::debug!("=== TYPEAHEAD DEBUG SESSION STARTED ===");
    }

    color_eyre::install()?;

    // Load config early to avoid defaults during app initialization
    let config_result = config::load_config();

    let args = Args::parse();

    let endpoint = args
        .endpoint
        .unwrap_or_else(|| config_result.config.search.endpoint.clone());
    validate_endpoint(&endpoint)?;

    let terminal = init_terminal()?;

    let mut app = App::new(&config_result.config);
    setup_search_worker(&mut app, &endpoint);

    let result = run(terminal, app, config_result);

    restore_terminal()?;
    let app = result?;

    // Output after terminal restore to prevent corruption
    handle_output(&app);

    #[cfg(debug_assertions)]
    log::debug!("=== TYPEAHEAD DEBUG SESSION ENDED ===");

    Ok(())
}

/// Validate that the endpoint is a well-formed absolute URL
fn validate_endpoint(endpoint: &str) -> Result<(), TypeaheadError> {
    reqwest::Url::parse(endpoint).map_err(|e| TypeaheadError::InvalidEndpoint {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Initialize terminal with raw mode, alternate screen, and bracketed paste
fn init_terminal() -> Result<DefaultTerminal> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        hook(info);
    }));

    enable_raw_mode()?;

    // If any subsequent operations fail, ensure raw mode is disabled
    match execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste) {
        Ok(_) => {}
        Err(e) => {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
    }

    match ratatui::Terminal::new(ratatui::backend::CrosstermBackend::new(stdout())) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen);
            let _ = disable_raw_mode();
            Err(e.into())
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() -> Result<()> {
    let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen);
    disable_raw_mode()?;
    Ok(())
}

fn run(
    mut terminal: DefaultTerminal,
    mut app: App,
    config_result: config::ConfigResult,
) -> Result<App> {
    if let Some(warning) = config_result.warning {
        app.notification.show_warning(&warning);
    }

    loop {
        if app.should_render() {
            terminal.draw(|frame| app.render(frame))?;
            app.clear_dirty();
        }

        app.handle_events()?;

        if app.should_quit() {
            break;
        }
    }

    // No timer or request callback outlives the widget
    app.search.shutdown();

    Ok(app)
}

/// Set up the search worker thread and channels
fn setup_search_worker(app: &mut App, endpoint: &str) {
    let (request_tx, request_rx) = std::sync::mpsc::channel();
    let (response_tx, response_rx) = std::sync::mpsc::channel();
    app.search.set_channels(request_tx, response_rx);

    let client = SearchClient::new(endpoint.to_string());
    worker::spawn_worker(client, request_rx, response_tx);
}

/// Handle output after terminal is restored
fn handle_output(app: &App) {
    // Print the picked result so the binary composes in pipelines
    if let Some(ref selection) = app.selection {
        println!("{}", selection);
    }
}
