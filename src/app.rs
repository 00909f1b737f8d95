use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use crate::{
    config::Config,
    entry::TextEntry,
    error::LoadError,
    loader,
    runtime::{AppEvent, EventSource, Runner, Ticker},
    session::Session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Control {
    Upload,
    Start,
    Reset,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::Upload, Control::Start, Control::Reset];

    pub fn shortcut(&self) -> &'static str {
        match self {
            Control::Upload => "^O",
            Control::Start => "^S",
            Control::Reset => "^R",
        }
    }

    pub fn is_enabled(&self, session: &Session) -> bool {
        match self {
            Control::Start => session.can_start(),
            Control::Upload | Control::Reset => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    config: Config,
    session: Session,
    entry: TextEntry,
    /// Path being typed for the Upload control
    path_prompt: Option<TextEntry>,
    status: Option<Status>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: Session::new(),
            entry: TextEntry::new(),
            path_prompt: None,
            status: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn path_prompt(&self) -> Option<&TextEntry> {
        self.path_prompt.as_ref()
    }

    fn transition(&mut self, f: impl FnOnce(Session) -> Session) {
        self.session = f(std::mem::take(&mut self.session));
    }

    pub fn load_text(&mut self, text: impl Into<String>) {
        self.entry.clear();
        self.transition(|s| s.load_reference(text));
    }

    /// Feed a file to the session. On failure the current reference stays.
    pub fn load_file(&mut self, path: &Path) -> Result<(), LoadError> {
        match loader::load_reference_file(path, &self.config.allowed_extensions) {
            Ok(text) => {
                let chars = text.chars().count();
                self.load_text(text);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.status = Some(Status::Info(format!("loaded {name} ({chars} chars)")));
                Ok(())
            }
            Err(LoadError::NoFileSelected) => Err(LoadError::NoFileSelected),
            Err(e) => {
                tracing::warn!("load failed: {e}");
                self.status = Some(Status::Error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn start(&mut self) {
        if !self.session.can_start() {
            return;
        }
        self.entry.clear();
        self.status = None;
        self.transition(Session::start);
    }

    pub fn reset(&mut self) {
        self.entry.clear();
        self.status = None;
        self.transition(Session::reset);
    }

    pub fn tick(&mut self) {
        self.transition(Session::tick);
    }

    pub fn press(&mut self, control: Control) {
        if !control.is_enabled(&self.session) {
            return;
        }
        match control {
            Control::Upload => self.path_prompt = Some(TextEntry::new()),
            Control::Start => self.start(),
            Control::Reset => self.reset(),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Action {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Paste(text) => {
                self.handle_paste(&text);
                Action::Continue
            }
            AppEvent::Tick => {
                self.tick();
                Action::Continue
            }
            AppEvent::Resize => Action::Continue,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = is_shortcut(key.modifiers);

        if ctrl && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        if self.path_prompt.is_some() {
            self.handle_prompt_key(key);
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char('o') if ctrl => self.press(Control::Upload),
            KeyCode::Char('s') if ctrl => self.press(Control::Start),
            KeyCode::Char('r') if ctrl => self.press(Control::Reset),
            KeyCode::Esc if self.session.is_running() => self.press(Control::Reset),
            KeyCode::Esc => return Action::Quit,
            _ if self.session.is_running() => self.handle_typing_key(key),
            KeyCode::Enter | KeyCode::Char('s') => self.press(Control::Start),
            KeyCode::Char('u') => self.press(Control::Upload),
            KeyCode::Char('r') => self.press(Control::Reset),
            KeyCode::Char('q') => return Action::Quit,
            _ => {}
        }
        Action::Continue
    }

    fn handle_typing_key(&mut self, key: KeyEvent) {
        if is_shortcut(key.modifiers) {
            return;
        }

        let edits_text = match key.code {
            KeyCode::Char(c) => {
                self.entry.insert(c);
                true
            }
            KeyCode::Enter => {
                self.entry.newline();
                true
            }
            KeyCode::Tab => {
                self.entry.insert('\t');
                true
            }
            KeyCode::Backspace => {
                self.entry.backspace();
                true
            }
            KeyCode::Delete => {
                self.entry.delete();
                true
            }
            KeyCode::Left => {
                self.entry.left();
                false
            }
            KeyCode::Right => {
                self.entry.right();
                false
            }
            KeyCode::Home => {
                self.entry.home();
                false
            }
            KeyCode::End => {
                self.entry.end();
                false
            }
            _ => return,
        };

        if edits_text {
            self.sync_input();
        } else {
            let cursor = self.entry.cursor();
            self.transition(|s| s.move_cursor(cursor));
        }
    }

    fn handle_paste(&mut self, text: &str) {
        let text = loader::normalize_newlines(text);
        if let Some(prompt) = self.path_prompt.as_mut() {
            text.chars()
                .filter(|c| *c != '\n')
                .for_each(|c| prompt.insert(c));
        } else if self.session.is_running() {
            text.chars().for_each(|c| self.entry.insert(c));
            self.sync_input();
        }
    }

    fn sync_input(&mut self) {
        let (typed, cursor) = self.entry.snapshot();
        self.transition(|s| s.apply_input(typed, cursor));
        if self.session.is_complete() {
            let m = self.session.metrics();
            self.status = Some(Status::Info(format!(
                "done: {} wpm / {}% acc in {}s",
                m.wpm,
                m.accuracy,
                self.session.elapsed_secs()
            )));
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.path_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.path_prompt = None,
            KeyCode::Enter => {
                let raw = prompt.text();
                self.path_prompt = None;
                // nothing typed means nothing selected; leave state alone
                let _ = self.load_file(&expand_home(raw.trim()));
            }
            KeyCode::Char(c) if !is_shortcut(key.modifiers) => prompt.insert(c),
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Left => prompt.left(),
            KeyCode::Right => prompt.right(),
            KeyCode::Home => prompt.home(),
            KeyCode::End => prompt.end(),
            _ => {}
        }
    }
}

/// Ctrl without Alt. Windows reports AltGr as Ctrl+Alt, and those keys
/// produce ordinary characters.
fn is_shortcut(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) && !modifiers.contains(KeyModifiers::ALT)
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Drive the app until quit or until the event source goes away.
///
/// The tick schedule is re-synced after every event, so it is cancelled on
/// the same step that stops the session.
pub fn run<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> io::Result<()> {
    runner.sync(app.session().is_running());
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while let Some(event) = runner.step() {
        let action = app.handle_event(event);
        runner.sync(app.session().is_running());
        if action == Action::Quit {
            break;
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    runner.cancel();
    Ok(())
}
