use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use czk_core::{update, AppState, FetchState, Msg};
use czk_logging::{czk_debug, czk_info};

use super::config::{AppConfig, CliOptions};
use super::effects::EffectRunner;
use super::logging;
use super::ui::input::{parse_command, Command, HELP_TEXT};
use super::ui::render::render;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Msg(Msg),
    Input(String),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let options = CliOptions::parse(std::env::args().skip(1))?;
    let config = AppConfig::load(options.config_path.as_deref())?;
    logging::initialize(config.log_destination);
    czk_info!("Starting with feed {}", config.feed_url);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.fetch_settings(), event_tx.clone())
        .context("failed to start fetch engine")?;
    spawn_input_reader(event_tx).context("failed to start input reader")?;

    let state = AppState::new()
        .with_feed_url(config.feed_url.clone())
        .with_rows_per_page(config.rows_per_page);

    let stdout = io::stdout();
    let mut app = App::new(state, runner, stdout.lock());
    writeln!(app.out, "{HELP_TEXT}\n")?;

    // The single startup fetch; nothing else sends Startup.
    app.dispatch(Msg::Startup)?;

    while let Ok(event) = event_rx.recv() {
        if !app.handle_event(event)? {
            break;
        }
    }

    czk_info!("Shutting down");
    Ok(())
}

struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    /// Input lines held back until the in-flight fetch settles.
    pending: VecDeque<String>,
    input_closed: bool,
}

impl<W: Write> App<W> {
    fn new(state: AppState, runner: EffectRunner, out: W) -> Self {
        Self {
            state,
            runner,
            out,
            pending: VecDeque::new(),
            input_closed: false,
        }
    }

    /// Returns `false` once the app should exit.
    fn handle_event(&mut self, event: AppEvent) -> io::Result<bool> {
        match event {
            AppEvent::Msg(msg) => {
                self.dispatch(msg)?;
                self.replay_pending()
            }
            AppEvent::Input(line) => {
                let quit = parse_command(&line, &self.state.view()) == Command::Quit;
                if self.fetch_in_flight() && !quit {
                    czk_debug!("Holding input {:?} until the feed arrives", line);
                    self.pending.push_back(line);
                    return Ok(true);
                }
                self.handle_input(&line)
            }
            AppEvent::InputClosed => {
                self.input_closed = true;
                Ok(self.fetch_in_flight())
            }
        }
    }

    fn fetch_in_flight(&self) -> bool {
        matches!(self.state.fetch_state(), FetchState::Loading { .. })
    }

    fn replay_pending(&mut self) -> io::Result<bool> {
        while !self.fetch_in_flight() {
            let Some(line) = self.pending.pop_front() else {
                return Ok(!self.input_closed);
            };
            if !self.handle_input(&line)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.run(effects);

        if was_dirty {
            let screen = render(&self.state.view());
            writeln!(self.out, "{screen}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Returns `false` when the user asked to quit.
    fn handle_input(&mut self, line: &str) -> io::Result<bool> {
        match parse_command(line, &self.state.view()) {
            Command::Msg(msg) => self.dispatch(msg)?,
            Command::Help => writeln!(self.out, "{HELP_TEXT}")?,
            Command::Quit => return Ok(false),
            Command::Invalid(reason) => {
                czk_debug!("Rejected input {:?}: {}", line, reason);
                writeln!(self.out, "{reason}")?;
            }
        }
        self.out.flush()?;
        Ok(true)
    }
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("czk-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if event_tx.send(AppEvent::Input(line)).is_err() {
                    return;
                }
            }
            let _ = event_tx.send(AppEvent::InputClosed);
        })?;
    Ok(())
}
