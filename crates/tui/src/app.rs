//! Application state and event loop for the terminal screen.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use fdq_client::{backend_for, Backend};
use fdq_core::session::QueryOutcome;
use fdq_core::{ClientConfig, FilterCriteria, Session};

use crate::ui;

/// Quick-query shortcuts shown under the search input, bound to F1-F4.
pub const QUICK_QUERIES: [(&str, &str); 4] = [
    ("All patients", "How many patients do we have?"),
    ("Female patients", "Show me all female patients"),
    ("Common conditions", "What are the most common conditions?"),
    ("Diabetes patients", "Show patients with diabetes"),
];

/// Labels of the filter form fields, in display order.
pub const FILTER_FIELD_LABELS: [&str; 4] = ["Age range", "Gender", "Severity", "Code"];

/// Which part of the screen has the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Search,
    Filters,
}

/// A finished dispatch delivered back to the event loop.
pub struct Completion {
    pub submission: u64,
    pub outcome: Result<QueryOutcome, String>,
}

/// View state of the single screen.
pub struct App {
    pub session: Session,
    pub input: String,
    pub focus: Focus,
    pub filter_fields: [String; 4],
    pub active_filter: usize,
    pub backend_label: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(backend_label: String) -> Self {
        Self {
            session: Session::new(),
            input: String::new(),
            focus: Focus::Search,
            filter_fields: Default::default(),
            active_filter: 0,
            backend_label,
            should_quit: false,
        }
    }

    /// Handle one key press.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        backend: &Arc<dyn Backend>,
        tx: &mpsc::UnboundedSender<Completion>,
    ) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.filter_fields = Default::default();
            self.session.clear_filters();
            return;
        }

        if key.code == KeyCode::Tab {
            self.focus = match self.focus {
                Focus::Search => Focus::Filters,
                Focus::Filters => Focus::Search,
            };
            return;
        }

        if let KeyCode::F(n @ 1..=4) = key.code {
            self.input = QUICK_QUERIES[usize::from(n) - 1].1.to_string();
            self.focus = Focus::Search;
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key, backend, tx),
            Focus::Filters => self.handle_filter_key(key),
        }
    }

    fn handle_search_key(
        &mut self,
        key: KeyEvent,
        backend: &Arc<dyn Backend>,
        tx: &mpsc::UnboundedSender<Completion>,
    ) {
        match key.code {
            KeyCode::Enter => self.submit(backend, tx),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.active_filter = self.active_filter.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.active_filter + 1 < self.filter_fields.len() {
                    self.active_filter += 1;
                }
            }
            KeyCode::Enter => self.apply_filters(),
            KeyCode::Backspace => {
                self.filter_fields[self.active_filter].pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.filter_fields[self.active_filter].push(c);
            }
            _ => {}
        }
    }

    /// Submit the search input. Empty input is ignored by the session and
    /// nothing is dispatched.
    fn submit(&mut self, backend: &Arc<dyn Backend>, tx: &mpsc::UnboundedSender<Completion>) {
        let Some((submission, query)) = self.session.submit(&self.input) else {
            return;
        };

        let backend = Arc::clone(backend);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = backend
                .dispatch(&query)
                .await
                .map_err(|err| err.to_string());
            // The receiver only goes away when the screen is shutting down.
            let _ = tx.send(Completion {
                submission,
                outcome,
            });
        });
    }

    /// Apply the filter form to the loaded set. Empty fields deactivate
    /// their predicate.
    fn apply_filters(&mut self) {
        let field = |idx: usize| -> Option<String> {
            let value = self.filter_fields[idx].trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        self.session.set_filters(FilterCriteria {
            age_range: field(0),
            gender: field(1),
            severity: field(2),
            code: field(3),
        });
    }

    /// Fold a finished dispatch into the session. Completions are applied in
    /// arrival order: the last one wins, stale or not.
    pub fn handle_completion(&mut self, done: Completion) {
        match done.outcome {
            Ok(outcome) => self.session.complete(done.submission, outcome),
            Err(message) => self.session.fail(done.submission, message),
        }
    }
}

/// Run the screen until the user quits.
pub async fn run(config: ClientConfig) -> Result<()> {
    let backend: Arc<dyn Backend> = Arc::from(backend_for(&config)?);
    let mut app = App::new(backend.describe());
    let (tx, mut rx) = mpsc::unbounded_channel();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut app, &backend, &tx, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    backend: &Arc<dyn Backend>,
    tx: &mpsc::UnboundedSender<Completion>,
    rx: &mut mpsc::UnboundedReceiver<Completion>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Short poll keeps the loop responsive to dispatch completions
        // without spinning.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, backend, tx);
                }
            }
        }

        while let Ok(done) = rx.try_recv() {
            app.handle_completion(done);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdq_core::records::ResultSet;
    use fdq_core::SessionState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_harness() -> (
        App,
        Arc<dyn Backend>,
        mpsc::UnboundedSender<Completion>,
        mpsc::UnboundedReceiver<Completion>,
    ) {
        let app = App::new("local simulator".to_string());
        let backend: Arc<dyn Backend> = Arc::new(fdq_client::LocalSimulator::unpaced());
        let (tx, rx) = mpsc::unbounded_channel();
        (app, backend, tx, rx)
    }

    #[tokio::test]
    async fn typing_and_submitting_moves_to_loading() {
        let (mut app, backend, tx, mut rx) = test_harness();

        for c in "find patients".chars() {
            app.handle_key(key(KeyCode::Char(c)), &backend, &tx);
        }
        app.handle_key(key(KeyCode::Enter), &backend, &tx);
        assert!(matches!(app.session.state(), SessionState::Loading { .. }));

        let done = rx.recv().await.expect("completion");
        app.handle_completion(done);
        assert!(matches!(app.session.state(), SessionState::Loaded { .. }));
    }

    #[tokio::test]
    async fn submitting_empty_input_is_ignored() {
        let (mut app, backend, tx, _rx) = test_harness();
        app.handle_key(key(KeyCode::Enter), &backend, &tx);
        assert!(matches!(app.session.state(), SessionState::Idle));
    }

    #[tokio::test]
    async fn quick_query_keys_fill_the_input() {
        let (mut app, backend, tx, _rx) = test_harness();
        app.handle_key(key(KeyCode::F(2)), &backend, &tx);
        assert_eq!(app.input, "Show me all female patients");
    }

    #[tokio::test]
    async fn filter_form_narrows_the_visible_set() {
        let (mut app, backend, tx, mut rx) = test_harness();

        for c in "Show me all female patients".chars() {
            app.handle_key(key(KeyCode::Char(c)), &backend, &tx);
        }
        app.handle_key(key(KeyCode::Enter), &backend, &tx);
        let done = rx.recv().await.expect("completion");
        app.handle_completion(done);
        assert_eq!(app.session.visible().map(|set| set.len()), Some(3));

        app.handle_key(key(KeyCode::Tab), &backend, &tx);
        app.handle_key(key(KeyCode::Down), &backend, &tx);
        for c in "Female".chars() {
            app.handle_key(key(KeyCode::Char(c)), &backend, &tx);
        }
        app.handle_key(key(KeyCode::Enter), &backend, &tx);

        match app.session.visible().expect("visible set") {
            ResultSet::Patients(patients) => {
                assert_eq!(patients.len(), 1);
                assert_eq!(patients[0].name, "Emily Johnson");
            }
            other => panic!("expected patients, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ctrl_l_clears_filters() {
        let (mut app, backend, tx, mut rx) = test_harness();

        for c in "find patients".chars() {
            app.handle_key(key(KeyCode::Char(c)), &backend, &tx);
        }
        app.handle_key(key(KeyCode::Enter), &backend, &tx);
        let done = rx.recv().await.expect("completion");
        app.handle_completion(done);

        app.handle_key(key(KeyCode::Tab), &backend, &tx);
        app.handle_key(key(KeyCode::Down), &backend, &tx);
        for c in "Female".chars() {
            app.handle_key(key(KeyCode::Char(c)), &backend, &tx);
        }
        app.handle_key(key(KeyCode::Enter), &backend, &tx);
        assert_eq!(app.session.visible().map(|set| set.len()), Some(1));

        app.handle_key(
            KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL),
            &backend,
            &tx,
        );
        assert_eq!(app.session.visible().map(|set| set.len()), Some(3));
        assert!(app.filter_fields.iter().all(String::is_empty));
    }

    #[tokio::test]
    async fn escape_requests_quit() {
        let (mut app, backend, tx, _rx) = test_harness();
        app.handle_key(key(KeyCode::Esc), &backend, &tx);
        assert!(app.should_quit);
    }
}
