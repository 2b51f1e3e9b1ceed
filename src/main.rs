use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use studyplan::app::{App, FormField, ResultsFocus};
use studyplan::config::Config;
use studyplan::event::{AppEvent, EventHandler};
use studyplan::plan::client::HttpPlanClient;
use studyplan::store::json_store::JsonStore;
use studyplan::store::plan_store::PlanStore;
use studyplan::ui::line_input::InputResult;
use studyplan::ui::screen;
use studyplan::ui::theme::Theme;
use studyplan::view::ViewId;

const TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(
    name = "studyplan",
    version,
    about = "Terminal study-plan generator with a saved plan library"
)]
struct Cli {
    #[arg(long, help = "Base URL of the plan generation service")]
    api_url: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Directory for saved plans")]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = "Log at debug level")]
    verbose: bool,

    #[arg(long, help = "Write the effective settings to the config file and exit")]
    save_config: bool,

    #[arg(long, help = "List available themes and exit")]
    list_themes: bool,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyplan")
        .join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // The terminal belongs to the TUI; logs only go to the file.
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let log_file =
        fs::File::create(log_dir.join("studyplan.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("config unreadable, using defaults: {e:#}");
        Config::default()
    });
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir.to_string_lossy().into_owned();
    }

    if cli.save_config {
        config.save().context("Failed to write config")?;
        println!("Wrote {}", Config::config_path().display());
        return Ok(());
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let json_store = match config.data_dir() {
        Some(dir) => JsonStore::with_base_dir(dir),
        None => JsonStore::new(),
    };
    let store = match json_store {
        Ok(store) => {
            info!(dir = %store.base_dir().display(), "plan store ready");
            Some(PlanStore::new(store))
        }
        Err(e) => {
            warn!("saved plans disabled: {e:#}");
            None
        }
    };

    let client = HttpPlanClient::new(&config.api_base_url, config.request_timeout());
    info!(url = client.url(), "generation endpoint");

    let mut app = App::new(theme, store, Arc::new(client));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let start = Instant::now();
    loop {
        terminal.draw(|frame| screen::draw(frame, app))?;
        app.frame_presented();

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        app.tick(start.elapsed());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.views.current() {
        ViewId::Config => handle_config_key(app, key),
        ViewId::Loading => {}
        ViewId::Results => handle_results_key(app, key),
    }
}

/// y/n prompt for a pending delete. Returns true when the key was consumed.
fn handle_delete_prompt(app: &mut App, key: KeyEvent) -> bool {
    if app.confirm_delete.is_none() {
        return false;
    }
    match key.code {
        KeyCode::Char('y') => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    true
}

fn handle_saved_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_saved(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_saved(),
        KeyCode::Enter => app.open_saved(app.saved_selected),
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete(app.saved_selected),
        _ => {}
    }
}

fn handle_config_key(app: &mut App, key: KeyEvent) {
    if handle_delete_prompt(app, key) {
        return;
    }

    let has_saved = !app.saved.is_empty();
    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab => {
            app.form.move_focus(true, has_saved);
            return;
        }
        KeyCode::BackTab => {
            app.form.move_focus(false, has_saved);
            return;
        }
        _ => {}
    }

    match app.form.focus {
        FormField::SavedList => handle_saved_list_key(app, key),
        FormField::Goal | FormField::Level => {
            let is_goal = app.form.focus == FormField::Goal;
            match key.code {
                KeyCode::Left | KeyCode::Right => {
                    let forward = key.code == KeyCode::Right;
                    if is_goal {
                        app.form.cycle_goal(forward);
                    } else {
                        app.form.cycle_level(forward);
                    }
                }
                KeyCode::Up => app.form.move_focus(false, has_saved),
                KeyCode::Down => app.form.move_focus(true, has_saved),
                KeyCode::Enter => app.submit(),
                _ => {}
            }
        }
        _ => match key.code {
            KeyCode::Up => app.form.move_focus(false, has_saved),
            KeyCode::Down => app.form.move_focus(true, has_saved),
            _ => {
                let Some(input) = app.form.focused_input() else {
                    return;
                };
                if input.handle(key) == InputResult::Submit {
                    app.submit();
                }
            }
        },
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    if app.detail.is_open() {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_detail(),
            KeyCode::Down | KeyCode::Char('j') => app.detail.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => app.detail.scroll_up(),
            _ => {}
        }
        return;
    }
    if handle_delete_prompt(app, key) {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Char('r') => app.restart(),
        KeyCode::Char('s') => app.save_current(),
        KeyCode::Tab => app.cycle_results_focus(true),
        KeyCode::BackTab => app.cycle_results_focus(false),
        _ => match app.results_focus {
            ResultsFocus::Timeline => match key.code {
                KeyCode::Up | KeyCode::Char('k') => app.select_prev_entry(),
                KeyCode::Down | KeyCode::Char('j') => app.select_next_entry(),
                KeyCode::Enter => app.open_detail(),
                _ => {}
            },
            ResultsFocus::Notes => {}
            ResultsFocus::SavedList => handle_saved_list_key(app, key),
        },
    }
}
