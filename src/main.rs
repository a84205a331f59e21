use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyEventKind, MouseButton, MouseEventKind,
};
use crossterm::execute;

use taskboard::app::App;
use taskboard::config::{Config, load_config, load_config_from_path};
use taskboard::event::{Event, EventHandler};
use taskboard::scheduler::Scheduler;
use taskboard::state::AppState;
use taskboard::surface::Screen;
use taskboard::system::collector::Collector;
use taskboard::system::platform::{Capabilities, NativeServices};
use taskboard::view::filter::FilterMode;
use taskboard::view::ViewId;
use taskboard::{format, logging, ui};

#[derive(Parser)]
#[command(
    name = "taskboard",
    version,
    about = "Terminal task manager for processes, users and services"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Color theme: dark, light
    #[arg(long)]
    theme: Option<String>,

    /// Start with automatic updates paused
    #[arg(long, default_value_t = false)]
    paused: bool,

    /// Write logs here instead of the default data directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print one view as a plain table and exit: processes, users, details, services
    #[arg(long, value_name = "VIEW")]
    print: Option<String>,

    /// Filter mode for --print: name, pid, status, user
    #[arg(long, requires = "print")]
    filter_mode: Option<String>,

    /// Filter query for --print
    #[arg(long, requires = "print")]
    filter: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    logging::init(&config.logging, cli.log_file.as_deref());

    if let Some(view) = &cli.print {
        return print_view(&config, &cli, view);
    }

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, &config).await;

    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: &Config) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms.max(100));
    let mut app = App::from_config(config);
    let mut events = EventHandler::new(tick_rate);
    tracing::info!(?tick_rate, "taskboard started");

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = app.map_key(key);
                app.dispatch(action);
                true
            }
            Event::Key(_) => false,
            Event::Mouse(mouse) => {
                if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                    let action = app.map_click(mouse.column, mouse.row);
                    app.dispatch(action);
                    true
                } else {
                    false
                }
            }
            Event::Tick => {
                app.on_tick();
                true
            }
            Event::Render => {
                let had_message = app.status_message.is_some();
                app.expire_status();
                had_message && app.status_message.is_none()
            }
            Event::Resize => true,
        };
        if should_draw {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
        }
    }

    tracing::info!("taskboard exiting");
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(theme) = &cli.theme {
        config.colors.theme = theme.clone();
    }
    if cli.paused {
        config.general.start_paused = true;
    }

    config
}

/// One collection cycle, one table on stdout.
fn print_view(config: &Config, cli: &Cli, view: &str) -> Result<()> {
    let view = ViewId::from_str_config(view);
    let mut state = AppState::default();
    let mode = cli
        .filter_mode
        .as_deref()
        .map(FilterMode::from_str_config)
        .unwrap_or_else(|| config.filters.mode_for(view));
    state.set_filter(view, mode, cli.filter.clone().unwrap_or_default());

    let mut scheduler = Scheduler::new(
        Collector::new(),
        NativeServices::default(),
        Capabilities::detect(),
        config.general.service_refresh_every,
    );
    let mut screen = Screen::new();
    scheduler.tick(&mut state, &mut screen);

    print!(
        "{}",
        format::render_plain_table(view.layout(), &screen.table(view).rows)
    );
    Ok(())
}
