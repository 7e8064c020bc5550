//! Şifre - a Turkish cipher puzzle in the terminal
//!
//! Crack the numbers. Read the sentence.

mod app;
mod tui;

use app::{App, Mode};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use directories::ProjectDirs;
use sifre::{Corpus, Engine, GameConfig, SifreResult, Tier};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tui::Tui;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Play every round at one tier (kolay/orta/zor) instead of progressing
    #[arg(short, long)]
    tier: Option<Tier>,

    /// Difficulty table (TOML) replacing the built-in one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sentence corpus (TOML) replacing the built-in one
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Seed for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Log file (defaults to the user data directory)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Open with a custom sentence
    #[arg(long, conflicts_with = "sentence_id")]
    sentence: Option<String>,

    /// Open with a corpus sentence by id
    #[arg(long)]
    sentence_id: Option<u32>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    let mut app = match build_app(&cli) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            eprintln!("sifre: {}", e);
            process::exit(1);
        }
    };

    tui::install_panic_hook();
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Main event loop
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => app.quit(),
                        KeyCode::Enter => app.on_enter(),
                        KeyCode::Left => app.on_left(),
                        KeyCode::Right => app.on_right(),
                        KeyCode::Char('?') => app.on_hint(),
                        KeyCode::Char(c) => app.on_char(c),
                        _ => {}
                    }
                }
            }
        }

        // The clock only moves here
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!(
        rounds = app.progress().performance_history().len(),
        wins = app.progress().total_wins(),
        "session ended"
    );

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

fn build_app(cli: &Cli) -> SifreResult<App> {
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::embedded()?,
    };
    let corpus = match &cli.corpus {
        Some(path) => Corpus::load(path)?,
        None => Corpus::embedded()?,
    };
    let engine = match cli.seed {
        Some(seed) => Engine::seeded(corpus, config, seed)?,
        None => Engine::from_entropy(corpus, config)?,
    };

    let mode = cli.tier.map_or(Mode::Progressive, Mode::Fixed);

    if let Some(text) = &cli.sentence {
        return App::with_custom_sentence(engine, mode, text);
    }
    if let Some(id) = cli.sentence_id {
        return App::with_sentence_id(engine, mode, id).ok_or_else(|| {
            sifre::SifreError::InvalidSentence(format!("no sentence with id {}", id))
        });
    }
    App::new(engine, mode)
}

/// Send tracing output to a file; the terminal belongs to the UI.
/// Logging stays off when no file can be opened.
fn init_logging(path: Option<&std::path::Path>) {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match ProjectDirs::from("", "", "sifre") {
            Some(dirs) => dirs.data_local_dir().join("sifre.log"),
            None => return,
        },
    };

    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = File::create(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
