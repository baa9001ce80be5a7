mod app;
mod config;
mod debounce;
mod error;
mod events;
mod layout;
mod log;
mod navigator;
mod search;
mod thumbnail;
mod tui;
mod viewport;
mod visibility;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use app::App;
use config::Config;
use error::{GalleryError, SearchResult};
use events::{Action, EventHandler};
use search::{PendingSearch, SearchClient, SearchResponse};
use thumbnail::ThumbnailLoaded;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging and panic hook
    if let Ok(log_path) = log::init() {
        log::log(&format!("Log file: {}", log_path.display()));
        log::install_panic_hook();
    }

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let mut server_url: Option<String> = None;
    let mut thumbnail_dir: Option<PathBuf> = None;
    let mut query_words: Vec<String> = vec![];

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--url" | "-u" => {
                if i + 1 < args.len() {
                    server_url = Some(args[i + 1].clone());
                    i += 2;
                    continue;
                } else {
                    eprintln!("Warning: --url requires an argument");
                }
            }
            "--thumbnails" | "-t" => {
                if i + 1 < args.len() {
                    thumbnail_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                    continue;
                } else {
                    eprintln!("Warning: --thumbnails requires a directory argument");
                }
            }
            arg if !arg.starts_with('-') => query_words.push(arg.to_string()),
            arg => eprintln!("Warning: unknown option '{}'", arg),
        }
        i += 1;
    }

    // Precedence: CLI > env var > config file > default
    let config = Config::load().with_overrides(server_url, thumbnail_dir);
    log::log(&format!(
        "Server {} • thumbnails {:?}",
        config.server_url(),
        config.thumbnail_source()
    ));

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let client = SearchClient::new(http.clone(), &config.server_url());

    log::log(&format!("Search endpoint: {}", client.endpoint()));

    // Setup terminal
    enable_raw_mode().map_err(|e| GalleryError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| GalleryError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state and run the initial search
    let mut app = App::new(&config);
    app.query = query_words.join(" ");
    app.submit_query();

    // Run the app
    let result = run_app(&mut terminal, &mut app, client, http).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::log(&format!("Exited with error: {:#}", e));
    }
    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: SearchClient,
    http: reqwest::Client,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    // Search responses, tagged with the sequence number of their query
    let (search_tx, mut search_rx) = mpsc::channel::<(u64, SearchResult<SearchResponse>)>(16);
    // Finished thumbnail loads
    let (thumb_tx, mut thumb_rx) = mpsc::channel::<ThumbnailLoaded>(256);

    // Event stream for keyboard, mouse and resize
    let mut event_stream = EventStream::new();

    loop {
        // Render, then run anything that needed the fresh layout
        terminal.draw(|frame| tui::ui::render(frame, app))?;
        app.after_draw();

        for pending in app.take_pending_searches() {
            spawn_search(client.clone(), pending, search_tx.clone());
        }
        for id in app.take_pending_loads() {
            thumbnail::spawn_load(
                http.clone(),
                app.thumbnails.source().clone(),
                id,
                thumb_tx.clone(),
            );
        }

        if app.should_quit {
            break;
        }

        let deadline = app.next_deadline();
        let timer = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at.into()).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            // Terminal events (keyboard, mouse, resize)
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Resize(width, height))) => {
                        log::log_event(&format!("Resize {}x{}", width, height));
                        app.on_resize(Instant::now());
                    }
                    Some(Ok(event)) => {
                        let action = EventHandler::handle_event(app, &event);
                        if action != Action::None {
                            app.dispatch(action, Instant::now());
                        }
                    }
                    Some(Err(e)) => {
                        log::log(&format!("Terminal event error: {}", e));
                    }
                    None => break,
                }
            }

            // Search responses
            Some((seq, result)) = search_rx.recv() => {
                app.on_search_response(seq, result);
            }

            // Thumbnail loads
            Some(loaded) = thumb_rx.recv() => {
                app.on_thumbnail_loaded(loaded);
            }

            // Debounce deadlines
            _ = timer => {
                app.poll_timers(Instant::now());
            }
        }
    }

    Ok(())
}

/// Run one search on a background task and send the response back tagged
/// with its sequence number.
fn spawn_search(
    client: SearchClient,
    pending: PendingSearch,
    tx: mpsc::Sender<(u64, SearchResult<SearchResponse>)>,
) {
    tokio::spawn(async move {
        let result = client.search(&pending.request).await;
        let _ = tx.send((pending.seq, result)).await;
    });
}
