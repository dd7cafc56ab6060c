use clap::Parser;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use tmul::{load_dir, Node, Renderer, StyleSheet, TmulResult};

/// Render the index.xml document of a directory in the terminal.
#[derive(Debug, Parser)]
#[command(name = "tmul", version, about)]
struct Cli {
    /// Directory holding the markup documents
    #[arg(default_value = "./xml")]
    dir: PathBuf,

    /// YAML file with per-kind default styles
    #[arg(long, value_name = "FILE")]
    styles: Option<PathBuf>,

    /// Log file (filter with RUST_LOG)
    #[arg(long, value_name = "FILE", default_value = "debug.log")]
    log: PathBuf,

    /// Print the rendered document to stdout instead of opening the viewer
    #[arg(long)]
    print: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log) {
        eprintln!("Failed to open log file {}: {}", cli.log.display(), e);
        process::exit(1);
    }

    if let Err(e) = run(&cli) {
        error!(error = %e, "tmul exited with an error");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to a file so they never draw over the alternate screen.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(cli: &Cli) -> TmulResult<()> {
    let sheet = match &cli.styles {
        Some(path) => StyleSheet::load(path)?,
        None => StyleSheet::default(),
    };
    debug!(kinds = ?sheet.kinds(), "style sheet ready");

    let documents = load_dir(&cli.dir)?;
    info!(dir = %cli.dir.display(), count = documents.len(), "documents loaded");
    let entry = documents.entry()?;

    let renderer = Renderer::new(&sheet);
    if cli.print {
        println!("{}", renderer.render(entry));
        return Ok(());
    }

    let mut screen = Screen::enter()?;
    screen.run(&renderer, entry)?;
    Ok(())
}

/// Alternate screen in raw mode. Restored on drop.
struct Screen {
    stdout: Stdout,
}

impl Screen {
    fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn run(&mut self, renderer: &Renderer<'_>, root: &Node) -> io::Result<()> {
        self.draw(&renderer.render(root))?;
        loop {
            match event::read()? {
                Event::Key(key) if is_quit(&key) => {
                    debug!("quit requested");
                    return Ok(());
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized");
                    self.draw(&renderer.render(root))?;
                }
                _ => {}
            }
        }
    }

    fn draw(&mut self, frame: &str) -> io::Result<()> {
        let (_, rows) = terminal::size()?;
        queue!(self.stdout, Clear(ClearType::All))?;
        // Raw mode does not return the carriage on '\n'
        for (row, line) in frame.lines().take(rows as usize).enumerate() {
            queue!(self.stdout, MoveTo(0, row as u16), Print(line))?;
        }
        self.stdout.flush()
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && key.code == KeyCode::Char('c')
}
