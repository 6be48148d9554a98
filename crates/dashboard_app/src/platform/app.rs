use std::io;
use std::panic;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use crossterm::cursor::Show;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use dashboard_core::{update, AppState, Msg, Screen, SERVICES};
use dashboard_logging::{dash_debug, dash_info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::ui::keys::{map_key, KeyAction};
use super::ui::render::{render, UiLocal};

const FRAME_INTERVAL: Duration = Duration::from_millis(75);

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::initialize(&config.log_path);
    dash_info!(
        "Dashboard starting base_url={} downloads={}",
        config.base_url,
        config.download_dir.display()
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::new(&config, msg_tx).context("starting backend engine")?;

    install_panic_hook();
    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(effects, msg_rx);
    let loop_result = app.run(&mut terminal);

    drop(guard);
    dash_info!("Dashboard exiting");
    loop_result
}

/// Holds the terminal in raw mode on the alternate screen until dropped.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // Built before the screen switch so a failure below still leaves raw mode.
        let guard = Self {
            restore: restore_terminal,
        };
        io::stdout().execute(EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = stdout.execute(Show);
}

/// Restores the terminal before the default hook prints, so the panic message is readable.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));
}

struct App {
    state: AppState,
    ui: UiLocal,
    effects: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    running: bool,
    needs_draw: bool,
}

impl App {
    fn new(effects: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        Self {
            state: AppState::new(),
            ui: UiLocal::default(),
            effects,
            msg_rx,
            running: true,
            needs_draw: true,
        }
    }

    fn run(&mut self, terminal: &mut Term) -> anyhow::Result<()> {
        while self.running {
            self.process_pending_messages();

            if self.needs_draw {
                let view = self.state.view();
                terminal.draw(|frame| render(frame, &view, &self.ui))?;
                self.needs_draw = false;
            }

            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Resize(_, _) => self.needs_draw = true,
                    _ => {}
                }
            } else if self.state.run_status().is_busy() {
                self.ui.spinner_frame = self.ui.spinner_frame.wrapping_add(1);
                self.needs_draw = true;
            }
        }
        Ok(())
    }

    fn process_pending_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch_msg(msg);
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let screen_before = self.state.screen();
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.needs_draw = true;
        }
        self.state = state;
        if self.state.screen() != screen_before {
            self.ui = UiLocal::default();
        }
        self.effects.enqueue(effects);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let editing = self.ui.template_input.is_some();
        let action = map_key(self.state.screen(), editing, key);
        dash_debug!("key {:?} -> {:?}", key.code, action);

        match action {
            KeyAction::Dispatch(msg) => self.dispatch_msg(msg),
            KeyAction::Quit => self.running = false,
            KeyAction::SelectPrevious => {
                self.ui.selected = self.ui.selected.saturating_sub(1);
                self.needs_draw = true;
            }
            KeyAction::SelectNext => {
                self.ui.selected = (self.ui.selected + 1).min(SERVICES.len() - 1);
                self.needs_draw = true;
            }
            KeyAction::TestSelected => {
                if let Some(descriptor) = SERVICES.get(self.ui.selected) {
                    self.dispatch_msg(Msg::TestClicked(descriptor.key));
                }
            }
            KeyAction::BeginTemplateEdit => {
                let current = self
                    .state
                    .template()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                self.ui.template_input = Some(current);
                self.needs_draw = true;
            }
            KeyAction::InputChar(c) => {
                if let Some(buffer) = self.ui.template_input.as_mut() {
                    buffer.push(c);
                    self.needs_draw = true;
                }
            }
            KeyAction::InputBackspace => {
                if let Some(buffer) = self.ui.template_input.as_mut() {
                    buffer.pop();
                    self.needs_draw = true;
                }
            }
            KeyAction::CommitTemplate => {
                if let Some(buffer) = self.ui.template_input.take() {
                    self.needs_draw = true;
                    if self.state.screen() == Screen::Run {
                        self.dispatch_msg(Msg::TemplatePicked(buffer));
                    }
                }
            }
            KeyAction::CancelEdit => {
                self.ui.template_input = None;
                self.needs_draw = true;
            }
            KeyAction::Ignore => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static RESTORES: AtomicUsize = AtomicUsize::new(0);

    fn count_restore() {
        RESTORES.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn guard_restores_on_normal_exit_and_on_panic() {
        drop(TerminalGuard {
            restore: count_restore,
        });
        assert_eq!(RESTORES.load(Ordering::SeqCst), 1);

        let unwound = panic::catch_unwind(|| {
            let _guard = TerminalGuard {
                restore: count_restore,
            };
            panic!("render failed");
        });
        assert!(unwound.is_err());
        assert_eq!(RESTORES.load(Ordering::SeqCst), 2);
    }
}
