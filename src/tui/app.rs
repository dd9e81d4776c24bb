use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::Settings;
use crate::core::export::{self, Format};
use crate::core::generator::{self, Mode, Request, ResultSet};
use crate::core::pattern::{FixedPattern, MAX_LEN};
use crate::core::prefix::Prefix;

use super::ui;

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Prefix,
    Mode,
    Pattern,
    Count,
}

impl Field {
    pub const ALL: &[Field] = &[Field::Prefix, Field::Mode, Field::Pattern, Field::Count];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_text_input(self) -> bool {
        matches!(self, Field::Pattern | Field::Count)
    }
}

/// State of the generation form.
#[derive(Debug, Clone)]
pub struct FormState {
    pub field: Field,
    pub prefix: Prefix,
    pub mode: Mode,
    /// Digits for fix-middle; kept apart from `end_pattern` across mode switches.
    pub middle_pattern: String,
    pub end_pattern: String,
    pub count: String,
}

impl FormState {
    fn new(settings: &Settings) -> Self {
        FormState {
            field: Field::Prefix,
            prefix: settings.prefix,
            mode: settings.mode,
            middle_pattern: String::new(),
            end_pattern: String::new(),
            count: settings.count.to_string(),
        }
    }

    /// The pattern field only exists in the fix modes.
    fn is_visible(&self, field: Field) -> bool {
        field != Field::Pattern || self.mode.uses_pattern()
    }

    fn focus_next(&mut self, forward: bool) {
        self.leave_field();
        let mut f = self.field;
        loop {
            f = if forward { f.next() } else { f.prev() };
            if self.is_visible(f) {
                break;
            }
        }
        self.field = f;
    }

    /// Normalize the count text when focus moves away from it.
    fn leave_field(&mut self) {
        if self.field == Field::Count {
            self.count = generator::parse_count(&self.count).to_string();
        }
    }

    /// Pattern text for the current mode; empty in random mode.
    pub fn pattern(&self) -> &str {
        match self.mode {
            Mode::Random => "",
            Mode::FixMiddle => &self.middle_pattern,
            Mode::FixEnd => &self.end_pattern,
        }
    }

    fn pattern_mut(&mut self) -> Option<&mut String> {
        match self.mode {
            Mode::Random => None,
            Mode::FixMiddle => Some(&mut self.middle_pattern),
            Mode::FixEnd => Some(&mut self.end_pattern),
        }
    }

    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            Field::Pattern => self.pattern_mut(),
            Field::Count => Some(&mut self.count),
            _ => None,
        }
    }

    fn push_char(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let limit = match self.field {
            Field::Pattern => MAX_LEN,
            // "1000000" plus room for an over-long entry to clamp
            _ => 8,
        };
        if let Some(text) = self.active_text_mut() {
            if text.len() < limit {
                text.push(c);
            }
        }
    }

    fn cycle(&mut self, forward: bool) {
        match self.field {
            Field::Prefix => self.prefix = self.prefix.cycle(forward),
            Field::Mode => self.mode = self.mode.cycle(forward),
            _ => {}
        }
    }

    /// Clamp the count and build a request from the current form.
    fn request(&mut self) -> Request {
        let count = generator::parse_count(&self.count);
        self.count = count.to_string();
        Request {
            prefix: self.prefix,
            mode: self.mode,
            pattern: FixedPattern::sanitize(self.pattern()),
            count,
        }
    }
}

pub struct App {
    pub form: FormState,
    pub results: ResultSet,
    /// Highlighted row in the results table.
    pub selected: usize,
    pub should_quit: bool,
    pub generating: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub export_dir: PathBuf,
    rng: StdRng,
}

impl App {
    pub fn new(settings: &Settings, rng: StdRng) -> Self {
        App {
            form: FormState::new(settings),
            results: ResultSet::default(),
            selected: 0,
            should_quit: false,
            generating: false,
            error: None,
            notice: None,
            export_dir: settings.export_dir.clone(),
            rng,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
        self.error = None;
        self.notice = None;

        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => {
                self.should_quit = true;
                Ok(Action::None)
            }

            (KeyCode::Tab, _) | (KeyCode::Down, KeyModifiers::SHIFT) => {
                self.form.focus_next(true);
                Ok(Action::None)
            }
            (KeyCode::BackTab, _) | (KeyCode::Up, KeyModifiers::SHIFT) => {
                self.form.focus_next(false);
                Ok(Action::None)
            }

            (KeyCode::Enter, _) | (KeyCode::Char('g'), _) => Ok(Action::Generate(self.form.request())),

            (KeyCode::Char('t'), _) => Ok(self.download_action(Format::Txt)),
            (KeyCode::Char('c'), _) => Ok(self.download_action(Format::Csv)),

            (KeyCode::Left, _) => {
                self.form.cycle(false);
                Ok(Action::None)
            }
            (KeyCode::Right, _) => {
                self.form.cycle(true);
                Ok(Action::None)
            }

            // Results table
            (KeyCode::Down | KeyCode::Char('j'), _) => {
                if self.selected + 1 < self.results.len() {
                    self.selected += 1;
                }
                Ok(Action::None)
            }
            (KeyCode::Up | KeyCode::Char('k'), _) => {
                self.selected = self.selected.saturating_sub(1);
                Ok(Action::None)
            }
            (KeyCode::PageDown, _) => {
                self.selected = (self.selected + 20).min(self.results.len().saturating_sub(1));
                Ok(Action::None)
            }
            (KeyCode::PageUp, _) => {
                self.selected = self.selected.saturating_sub(20);
                Ok(Action::None)
            }
            (KeyCode::Home, _) => {
                self.selected = 0;
                Ok(Action::None)
            }
            (KeyCode::End, _) => {
                self.selected = self.results.len().saturating_sub(1);
                Ok(Action::None)
            }

            // Text input
            (KeyCode::Backspace, _) if self.form.field.is_text_input() => {
                if let Some(text) = self.form.active_text_mut() {
                    text.pop();
                }
                Ok(Action::None)
            }
            (KeyCode::Char(c), m) if self.form.field.is_text_input() && !m.contains(KeyModifiers::CONTROL) => {
                self.form.push_char(c);
                Ok(Action::None)
            }

            _ => Ok(Action::None),
        }
    }

    fn download_action(&mut self, format: Format) -> Action {
        if self.results.is_empty() {
            self.error = Some("Nothing to download yet. Press Enter to generate.".into());
            return Action::None;
        }
        Action::Download(format)
    }

    /// Run one generation request, replacing the previous result set.
    pub fn generate(&mut self, req: &Request) {
        log::info!(
            "generating {} numbers: prefix={} mode={} pattern='{}'",
            req.count,
            req.prefix,
            req.mode,
            req.pattern
        );
        match generator::generate(req, &mut self.rng) {
            Ok(set) => {
                self.results = set;
                self.selected = 0;
            }
            Err(e) => {
                log::warn!("generation failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn download(&mut self, format: Format) {
        match export::download(&self.results, format, &self.export_dir) {
            Ok(path) => self.notice = Some(format!("Saved {}", path.display())),
            Err(e) => {
                log::warn!("download failed: {:#}", e);
                self.error = Some(format!("{:#}", e));
            }
        }
    }
}

#[derive(Debug)]
pub enum Action {
    None,
    Generate(Request),
    Download(Format),
}

// --- TUI loop ---

pub fn run(settings: &Settings, rng: StdRng) -> Result<()> {
    let mut app = App::new(settings, rng);
    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != crossterm::event::KeyEventKind::Press {
                    continue;
                }

                let action = app.handle_key(key.code, key.modifiers)?;

                match action {
                    Action::None => {}
                    Action::Generate(req) => {
                        app.generating = true;
                        terminal.draw(|frame| ui::draw(frame, app))?;
                        app.generate(&req);
                        app.generating = false;
                    }
                    Action::Download(format) => app.download(format),
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn make_app() -> App {
        App::new(&Settings::default(), StdRng::seed_from_u64(0))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE).unwrap();
        }
    }

    fn clear_field(app: &mut App) {
        for _ in 0..10 {
            app.handle_key(KeyCode::Backspace, KeyModifiers::NONE).unwrap();
        }
    }

    fn submit(app: &mut App) -> Request {
        match app.handle_key(KeyCode::Enter, KeyModifiers::NONE).unwrap() {
            Action::Generate(req) => req,
            other => panic!("expected Generate, got {:?}", other),
        }
    }

    #[test]
    fn quit_on_q() {
        let mut app = make_app();
        app.handle_key(KeyCode::Char('q'), KeyModifiers::NONE).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn quit_on_ctrl_c() {
        let mut app = make_app();
        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn defaults_from_settings() {
        let app = make_app();
        assert_eq!(app.form.prefix.to_string(), "0301");
        assert_eq!(app.form.mode, Mode::Random);
        assert_eq!(app.form.count, "1000");
        assert_eq!(app.form.field, Field::Prefix);
    }

    #[test]
    fn prefix_cycles_with_arrows() {
        let mut app = make_app();
        app.handle_key(KeyCode::Right, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.prefix.to_string(), "0302");
        app.handle_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
        app.handle_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.prefix.to_string(), "0349");
    }

    #[test]
    fn tab_skips_pattern_in_random_mode() {
        let mut app = make_app();
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.field, Field::Mode);
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.field, Field::Count);
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.field, Field::Prefix);
    }

    #[test]
    fn tab_visits_pattern_in_fix_modes() {
        let mut app = make_app();
        app.form.field = Field::Mode;
        app.handle_key(KeyCode::Right, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.mode, Mode::FixMiddle);
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.field, Field::Pattern);
        app.handle_key(KeyCode::BackTab, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.field, Field::Mode);
    }

    #[test]
    fn pattern_accepts_only_five_digits() {
        let mut app = make_app();
        app.form.mode = Mode::FixEnd;
        app.form.field = Field::Pattern;
        type_str(&mut app, "1a2-3x4567");
        assert_eq!(app.form.end_pattern, "12345");
    }

    #[test]
    fn each_fix_mode_keeps_its_own_digits() {
        let mut app = make_app();
        app.form.field = Field::Mode;
        app.handle_key(KeyCode::Right, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.mode, Mode::FixMiddle);
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        type_str(&mut app, "987");

        app.handle_key(KeyCode::BackTab, KeyModifiers::NONE).unwrap();
        app.handle_key(KeyCode::Right, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.mode, Mode::FixEnd);
        let req = submit(&mut app);
        assert_eq!(req.mode, Mode::FixEnd);
        assert_eq!(req.pattern.as_str(), "");

        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.field, Field::Pattern);
        type_str(&mut app, "12");
        assert_eq!(submit(&mut app).pattern.as_str(), "12");

        app.handle_key(KeyCode::BackTab, KeyModifiers::NONE).unwrap();
        app.handle_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.mode, Mode::FixMiddle);
        assert_eq!(submit(&mut app).pattern.as_str(), "987");
        assert_eq!(app.form.middle_pattern, "987");
        assert_eq!(app.form.end_pattern, "12");

        app.handle_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.mode, Mode::Random);
        assert_eq!(submit(&mut app).pattern.as_str(), "");
    }

    #[test]
    fn count_is_clamped_on_submit() {
        let mut app = make_app();
        app.form.field = Field::Count;
        clear_field(&mut app);
        type_str(&mut app, "9999999");
        let req = submit(&mut app);
        assert_eq!(req.count, 1_000_000);
        assert_eq!(app.form.count, "1000000");

        clear_field(&mut app);
        let req = submit(&mut app);
        assert_eq!(req.count, 1);
    }

    #[test]
    fn count_is_clamped_when_leaving_field() {
        let mut app = make_app();
        app.form.field = Field::Count;
        clear_field(&mut app);
        type_str(&mut app, "0");
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.count, "1");
    }

    #[test]
    fn submit_builds_request_from_form() {
        let mut app = make_app();
        app.form.field = Field::Mode;
        app.handle_key(KeyCode::Left, KeyModifiers::NONE).unwrap();
        assert_eq!(app.form.mode, Mode::FixEnd);
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        type_str(&mut app, "12");
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE).unwrap();
        clear_field(&mut app);
        type_str(&mut app, "5");

        let req = submit(&mut app);
        assert_eq!(req.mode, Mode::FixEnd);
        assert_eq!(req.pattern.as_str(), "12");
        assert_eq!(req.count, 5);
    }

    #[test]
    fn generate_replaces_results() {
        let mut app = make_app();
        app.form.count = "50".into();
        let req = submit(&mut app);
        app.generate(&req);
        assert_eq!(app.results.len(), 50);

        app.selected = 10;
        app.form.count = "7".into();
        let req = submit(&mut app);
        app.generate(&req);
        assert_eq!(app.results.len(), 7);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn infeasible_request_shows_error_and_keeps_results() {
        let mut app = make_app();
        app.form.count = "3".into();
        let req = submit(&mut app);
        app.generate(&req);

        app.form.mode = Mode::FixEnd;
        app.form.end_pattern = "12345".into();
        app.form.count = "500".into();
        let req = submit(&mut app);
        app.generate(&req);
        assert!(app.error.as_deref().unwrap_or("").contains("exceeds"));
        assert_eq!(app.results.len(), 3);
    }

    #[test]
    fn download_requires_results() {
        let mut app = make_app();
        let action = app.handle_key(KeyCode::Char('t'), KeyModifiers::NONE).unwrap();
        assert!(matches!(action, Action::None));
        assert!(app.error.is_some());
    }

    #[test]
    fn download_writes_into_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = make_app();
        app.export_dir = dir.path().to_path_buf();
        app.form.count = "12".into();
        let req = submit(&mut app);
        app.generate(&req);

        let format = match app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE).unwrap() {
            Action::Download(format) => format,
            other => panic!("expected Download, got {:?}", other),
        };
        assert_eq!(format, Format::Csv);
        app.download(format);
        assert!(app.notice.is_some());

        let content = std::fs::read_to_string(dir.path().join("phone-numbers.csv")).unwrap();
        assert_eq!(content.lines().count(), 13);
    }

    #[test]
    fn table_navigation_stays_in_bounds() {
        let mut app = make_app();
        app.form.count = "30".into();
        let req = submit(&mut app);
        app.generate(&req);

        app.handle_key(KeyCode::Up, KeyModifiers::NONE).unwrap();
        assert_eq!(app.selected, 0);
        app.handle_key(KeyCode::PageDown, KeyModifiers::NONE).unwrap();
        assert_eq!(app.selected, 20);
        app.handle_key(KeyCode::PageDown, KeyModifiers::NONE).unwrap();
        assert_eq!(app.selected, 29);
        app.handle_key(KeyCode::Down, KeyModifiers::NONE).unwrap();
        assert_eq!(app.selected, 29);
        app.handle_key(KeyCode::Home, KeyModifiers::NONE).unwrap();
        assert_eq!(app.selected, 0);
    }
}
