use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::{info, warn};

use topowatch::app::{App, View};
use topowatch::config::{Settings, ThemeMode};
use topowatch::data::{export, TopologyData};
use topowatch::telemetry::{self, LogTarget};
use topowatch::ui::{self, Theme};
use topowatch::{events, FileSource, SnapshotSource, StreamSource};

#[derive(Parser, Debug)]
#[command(name = "topowatch")]
#[command(about = "Diagnostic TUI for edge gateway topology status")]
struct Args {
    /// Path to a topology snapshot file
    #[arg(short, long, default_value = "topology.json", conflicts_with = "connect")]
    file: PathBuf,

    /// Connect to a TCP endpoint streaming newline-delimited snapshots (host:port)
    #[arg(short, long, conflicts_with = "file")]
    connect: Option<String>,

    /// Refresh interval in milliseconds (only used with --file)
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Settings file (defaults to ./topowatch.{toml,yaml,json} if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color scheme
    #[arg(short, long, value_enum)]
    theme: Option<ThemeMode>,

    /// Resolve the snapshot file, write a JSON report and exit
    #[arg(short, long, conflicts_with_all = ["connect", "check"])]
    export: Option<PathBuf>,

    /// Resolve the snapshot file, print diagnostics and exit (fails on cycles)
    #[arg(long, conflicts_with = "connect")]
    check: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(refresh) = args.refresh {
        settings.refresh_ms = refresh;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }

    let one_shot = args.export.is_some() || args.check;
    telemetry::init(
        &settings,
        if one_shot {
            LogTarget::Stderr
        } else {
            LogTarget::FileOnly
        },
    )?;

    if let Some(ref export_path) = args.export {
        return export_to_file(&args.file, export_path);
    }

    if args.check {
        return check_file(&args.file);
    }

    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, &settings);
    }

    run_with_file(&args.file, &settings)
}

/// Run with a file-based data source
fn run_with_file(path: &Path, settings: &Settings) -> Result<()> {
    info!(path = %path.display(), "watching snapshot file");
    let source = Box::new(FileSource::new(path));
    run_tui(source, settings, settings.refresh_interval())
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("Failed to connect to {}", addr))?;
        println!("Connected!");
        info!(%addr, "connected to snapshot stream");
        Ok::<_, anyhow::Error>(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn SnapshotSource>)
    })?;

    // Snapshots are pushed, so poll continuously
    run_tui(source, settings, Duration::from_millis(100))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn SnapshotSource>,
    settings: &Settings,
    refresh_interval: Duration,
) -> Result<()> {
    // Detect before raw mode; the query needs the terminal to answer
    let theme = Theme::from_mode(settings.theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(source, theme);
    if !app.reload_data() {
        if let Some(ref e) = app.load_error {
            warn!(error = %e, "initial load failed");
        }
    }

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
                    .intersection(area);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Nodes => ui::nodes::render(frame, app, chunks[2]),
                View::Edges => ui::edges::render(frame, app, chunks[2]),
                View::Diagnostics => ui::diagnostics::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                _ => {}
            }
        }

        app.tick();

        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Resolve a snapshot file and write the JSON report
fn export_to_file(snapshot_path: &Path, export_path: &Path) -> Result<()> {
    let data = TopologyData::load(snapshot_path)?;
    export::write_report(&data, export_path)?;

    println!("Exported topology state to: {}", export_path.display());
    Ok(())
}

/// Resolve a snapshot file and print its diagnostics
fn check_file(snapshot_path: &Path) -> Result<()> {
    let data = TopologyData::load(snapshot_path)?;
    let counts = data.counts();

    println!(
        "{}: {} nodes, {} edges, {} diagnostics",
        snapshot_path.display(),
        counts.total,
        data.edges.len(),
        data.graph.diagnostics.len()
    );
    for diagnostic in data.diagnostics() {
        println!("  [{}] {}", diagnostic.severity().symbol(), diagnostic);
    }

    if data.graph.has_cycles() {
        bail!("topology contains cyclic membership");
    }
    Ok(())
}
