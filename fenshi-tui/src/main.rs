/// Fenshi Terminal Chart
///
/// Renders a live intraday tick chart (price line, running VWAP, volume bars)
/// in the terminal, fed by a seeded mock random walk.
use std::{
    error::Error,
    fs::File,
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use chrono::{TimeDelta, Utc};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fenshi_chart::{
    ChartConfig, ColorTokens, CoordinateType, FenshiChart, Gesture, MockWalk, OptionsUpdate,
    Padding, Pane, Scene, Theme,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod feed;
mod layout;
mod mouse;
mod render;

use feed::spawn_mock_feed;
use layout::{PX_PER_COL, PX_PER_ROW, PaneLayout};
use mouse::MouseTracker;
use render::{Status, render_ui};

const FRAME_RATE: Duration = Duration::from_millis(50);
const KEY_SCROLL_STEP: f64 = 30.0;

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
struct Settings {
    tick_period: Duration,
    seed: u64,
    max_points: usize,
    history: usize,
    start_price: f64,
    options: Option<String>,
    log_file: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Settings {
    fn from_env() -> Self {
        Self {
            tick_period: Duration::from_millis(env_or("FENSHI_TICK_MS", 500)),
            seed: env_or("FENSHI_SEED", 7),
            max_points: env_or("FENSHI_MAX_POINTS", 300),
            history: env_or("FENSHI_HISTORY", 120),
            start_price: env_or("FENSHI_START_PRICE", 100.0),
            options: std::env::var("FENSHI_OPTIONS").ok(),
            log_file: env_or("FENSHI_LOG", "fenshi-tui.log".to_string()),
        }
    }
}

/// Log to a file; the terminal belongs to the chart.
fn init_logging(path: &str) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Terminal-sized defaults, then the user's JSON overrides.
fn build_chart(settings: &Settings) -> Result<FenshiChart, Box<dyn Error>> {
    let terminal_defaults = OptionsUpdate {
        padding: Some(Padding {
            top: PX_PER_ROW,
            right: 14.0 * PX_PER_COL,
            bottom: PX_PER_ROW,
            left: 14.0 * PX_PER_COL,
        }),
        time_axis_height: Some(2.0 * PX_PER_ROW),
        max_data_points: Some(settings.max_points),
        ..OptionsUpdate::default()
    };

    let mut chart = FenshiChart::new(ChartConfig::default());
    chart.update_options(&terminal_defaults)?;

    if let Some(json) = settings.options.as_deref() {
        let update = OptionsUpdate::from_json(json)?;
        chart.update_options(&update)?;
        info!(?update, "applied FENSHI_OPTIONS");
    }

    Ok(chart)
}

fn next_coordinate_type(current: CoordinateType) -> CoordinateType {
    match current {
        CoordinateType::Normal => CoordinateType::Full,
        CoordinateType::Full => CoordinateType::Limit,
        CoordinateType::Limit => CoordinateType::Normal,
    }
}

/// Key bindings that change options. Returns None for keys handled elsewhere.
fn key_update(code: KeyCode, config: &ChartConfig) -> Option<OptionsUpdate> {
    let update = match code {
        KeyCode::Char('t') => OptionsUpdate {
            theme: Some(match config.theme {
                Theme::Dark => Theme::Light,
                Theme::Light => Theme::Dark,
            }),
            ..OptionsUpdate::default()
        },
        KeyCode::Char('c') => OptionsUpdate {
            coordinate_type: Some(next_coordinate_type(config.coordinate_type)),
            ..OptionsUpdate::default()
        },
        KeyCode::Char('a') => OptionsUpdate {
            show_average: Some(!config.show_average),
            ..OptionsUpdate::default()
        },
        KeyCode::Char('x') => OptionsUpdate {
            show_crosshair: Some(!config.show_crosshair),
            ..OptionsUpdate::default()
        },
        KeyCode::Char('i') => OptionsUpdate {
            info_bar_enabled: Some(!config.info_bar_enabled),
            ..OptionsUpdate::default()
        },
        KeyCode::Char('s') => OptionsUpdate {
            enable_scroll: Some(!config.enable_scroll),
            ..OptionsUpdate::default()
        },
        _ => return None,
    };
    Some(update)
}

/// Owned render inputs so the chart lock is released before terminal I/O.
/// Also resizes the chart when the price pane changed size.
fn snapshot(
    chart: &mut FenshiChart,
    layout: &PaneLayout,
    chart_size: &mut (f64, f64),
    paused: bool,
) -> (Scene, ColorTokens, Status) {
    let wanted = layout.chart_size();
    if wanted != *chart_size {
        *chart_size = wanted;
        chart.handle(Gesture::Resize {
            width: wanted.0,
            height: wanted.1,
        });
    }

    let status = Status {
        coordinate_type: chart.config().coordinate_type,
        theme: chart.config().theme.as_str(),
        paused,
        scroll_position: chart.viewport().scroll_position(),
        len: chart.len(),
        capacity: chart.config().max_data_points,
    };
    (chart.scene(), chart.config().colors.clone(), status)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env();
    init_logging(&settings.log_file)?;
    info!(?settings, "starting fenshi-tui");

    let mut chart = build_chart(&settings)?;
    let start = Utc::now() - TimeDelta::seconds(settings.history as i64);
    let mut walk = MockWalk::new(start, settings.start_price, settings.seed)?;
    chart.set_initial_data(walk.by_ref().take(settings.history));

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let chart = Arc::new(Mutex::new(chart));
    let paused = Arc::new(AtomicBool::new(false));
    let feed = spawn_mock_feed(
        Arc::clone(&chart),
        walk,
        settings.tick_period,
        Arc::clone(&paused),
    );

    let mut tracker = MouseTracker::default();
    let mut chart_size = (0.0, 0.0);

    loop {
        let size = terminal.size()?;
        let layout = PaneLayout::new(Rect::new(0, 0, size.width, size.height));

        let (scene, tokens, status) = {
            let mut guard = chart.lock().await;
            snapshot(
                &mut guard,
                &layout,
                &mut chart_size,
                paused.load(Ordering::Relaxed),
            )
        };
        terminal.draw(|f| render_ui(f, &layout, &scene, &tokens, &status))?;

        if !event::poll(FRAME_RATE)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let mut guard = chart.lock().await;
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('p') => {
                        let now_paused = !paused.load(Ordering::Relaxed);
                        paused.store(now_paused, Ordering::Relaxed);
                        info!(paused = now_paused, "feed toggled");
                    }
                    KeyCode::Left | KeyCode::Right => {
                        let dx = if key.code == KeyCode::Left {
                            KEY_SCROLL_STEP
                        } else {
                            -KEY_SCROLL_STEP
                        };
                        guard.handle(Gesture::Wheel {
                            dx,
                            dy: 0.0,
                            shift: false,
                            pane: Pane::Price,
                        });
                    }
                    KeyCode::Home => {
                        guard.set_scroll_position(0.0);
                    }
                    KeyCode::End => {
                        guard.set_scroll_position(1.0);
                    }
                    code => {
                        if let Some(update) = key_update(code, guard.config()) {
                            if let Err(error) = guard.update_options(&update) {
                                warn!(%error, "rejected option change");
                            }
                        }
                    }
                }
            }
            Event::Mouse(mouse) => {
                let gestures = tracker.translate(mouse, &layout);
                if !gestures.is_empty() {
                    let mut guard = chart.lock().await;
                    for gesture in gestures {
                        guard.handle(gesture);
                    }
                }
            }
            _ => {}
        }
    }

    feed.abort();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
