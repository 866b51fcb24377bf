use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use qa_core::{update, AppState, AppViewModel, Msg};
use qa_logging::{qa_error, qa_info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::cli::Cli;
use super::config::ClientConfig;
use super::effects::EffectRunner;
use super::logging;
use super::ui::keys::{self, KeyAction};
use super::ui::render;

const TICK_INTERVAL: Duration = Duration::from_millis(80);
const INPUT_POLL: Duration = Duration::from_millis(16);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::load(cli.config.as_deref())?.merged_with(&cli);
    let settings = config.dispatch_settings()?;
    logging::initialize(&config.log_file, cli.log_level);
    match &config.source {
        Some(path) => qa_info!("Loaded config from {:?}", path),
        None => qa_info!("No config file; using defaults"),
    }
    qa_info!(
        "Starting in {:?} mode; backend {} site {}",
        config.mode,
        settings.backend_url,
        settings.site_url
    );

    let runner = EffectRunner::new(settings).context("failed to start request engine")?;
    let state = AppState::new(config.mode.into()).with_top_k(config.top_k);

    let mut guard = TerminalGuard::enter().context("failed to set up terminal")?;
    let result = AppEventLoop::new(state, runner).run(&mut guard.terminal);
    drop(guard);

    if let Err(err) = &result {
        qa_error!("Event loop failed: {:#}", err);
    }
    result
}

/// Raw mode and the alternate screen for as long as this value lives.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableBracketedPaste,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

struct AppEventLoop {
    state: AppState,
    view: AppViewModel,
    runner: EffectRunner,
    needs_redraw: bool,
    answer_scroll_limit: u16,
    last_tick: Instant,
}

impl AppEventLoop {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        let view = state.view();
        Self {
            state,
            view,
            runner,
            needs_redraw: true,
            answer_scroll_limit: 0,
            last_tick: Instant::now(),
        }
    }

    fn run(mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        self.dispatch_msg(Msg::Started);

        loop {
            for msg in self.runner.drain() {
                self.dispatch_msg(msg);
            }

            if self.last_tick.elapsed() >= TICK_INTERVAL {
                self.dispatch_msg(Msg::Tick);
                self.last_tick = Instant::now();
            }

            if event::poll(INPUT_POLL)? {
                let action = match event::read()? {
                    Event::Key(key) => keys::map_key(key, &self.view),
                    Event::Paste(text) => keys::map_paste(&text, &self.view),
                    Event::Resize(..) => {
                        self.needs_redraw = true;
                        None
                    }
                    _ => None,
                };
                match action {
                    Some(KeyAction::Quit) => break,
                    Some(KeyAction::Dispatch(msg)) => self.dispatch_msg(msg),
                    None => {}
                }
            }

            if self.needs_redraw {
                let mut limit = self.answer_scroll_limit;
                terminal.draw(|frame| {
                    render::render(frame, &self.view);
                    limit = render::answer_scroll_limit(frame.area(), &self.view);
                })?;
                self.needs_redraw = false;
                if limit != self.answer_scroll_limit {
                    self.answer_scroll_limit = limit;
                    self.dispatch_msg(Msg::AnswerViewport { max_scroll: limit });
                }
            }
        }

        qa_info!("Quit requested");
        Ok(())
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.view = state.view();
            self.needs_redraw = true;
        }
        self.state = state;
        self.runner.enqueue(effects);
    }
}
