//! Main application state and TUI event loop for the BI assistant.
//!
//! [`App`] owns the theme, the chat session, and the input line. The screen
//! is a header, the transcript beside an attachment pane, the input line and a
//! one-line status bar.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use assistant_core::models::Attachment;
use assistant_runtime::session::ChatSession;

use crate::chart_view;
use crate::chat_view;
use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

/// Rows moved by PageUp / PageDown.
const PAGE: u16 = 10;

/// Root application state for the chat TUI.
pub struct App {
    pub theme: Theme,
    pub session: ChatSession,
    /// Display timezone name.
    pub timezone: String,
    /// Text typed so far on the input line.
    pub input: String,
    /// Rows scrolled up from the newest transcript line.
    pub scroll_back: u16,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, session: ChatSession, timezone: String) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            session,
            timezone,
            input: String::new(),
            scroll_back: 0,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the chat TUI until the user quits.
    ///
    /// Polls the terminal with a 250 ms timeout so the caller's Ctrl+C
    /// signal future still gets a chance to run between key presses.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key)
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
            tokio::task::yield_now().await;
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Up => self.scroll_back = self.scroll_back.saturating_add(1),
            KeyCode::Down => self.scroll_back = self.scroll_back.saturating_sub(1),
            KeyCode::PageUp => self.scroll_back = self.scroll_back.saturating_add(PAGE),
            KeyCode::PageDown => self.scroll_back = self.scroll_back.saturating_sub(PAGE),
            _ => {}
        }
    }

    /// Send the input line to the session and jump back to the newest turn.
    pub fn submit(&mut self) {
        let query = std::mem::take(&mut self.input);
        if self.session.ask(&query).is_some() {
            self.scroll_back = 0;
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, body_area, input_area, status_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let data_file = self
            .session
            .data()
            .data_path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "no data file".to_string());
        let rows = self.session.dataset().len();
        let header = Header::new(&data_file, rows, &self.timezone, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        let [chat_area, pane_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body_area);
        chat_view::render_transcript(
            frame,
            chat_area,
            self.session.transcript(),
            self.scroll_back,
            &self.theme,
        );
        self.render_attachment(frame, pane_area);

        let input = Paragraph::new(Line::from(vec![
            Span::styled("> ", self.theme.header_accent),
            Span::styled(self.input.as_str(), self.theme.input),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.separator)
                .title(" Ask "),
        );
        frame.render_widget(input, input_area);

        frame.render_widget(Paragraph::new(self.status_line()), status_area);
    }

    fn render_attachment(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        match self.session.transcript().latest_attachment() {
            Some(Attachment::Table(ranking)) => {
                let title = format!("{} by {}", ranking.key_column, ranking.value_column);
                table_view::render_ranking(frame, area, &title, ranking, &self.theme);
            }
            Some(Attachment::Chart(spec)) => {
                chart_view::render_chart(frame, area, spec, &self.theme);
            }
            None => table_view::render_no_data(frame, area, &self.theme),
        }
    }

    fn status_line(&self) -> Line<'_> {
        match self.session.data().last_error() {
            Some(err) => Line::from(Span::styled(
                format!("Data load failed: {err}"),
                self.theme.error,
            )),
            None => Line::from(Span::styled(
                "Enter: ask · ↑/↓ PgUp/PgDn: scroll · Esc: quit",
                self.theme.dim,
            )),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::models::{columns, Dataset, Role, SalesRecord};
    use assistant_runtime::data_manager::DataManager;
    use assistant_runtime::responder::Responder;
    use assistant_runtime::session::FixedClock;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn dataset() -> Dataset {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let record = |item: &str, customer: &str, ship: &str, price: f64| SalesRecord {
            order_date: day.and_hms_opt(9, 0, 0),
            order_release_date: day.and_hms_opt(10, 0, 0),
            date_shipped: day.and_hms_opt(16, 0, 0),
            item_id: item.to_string(),
            customer_id: customer.to_string(),
            ship_code: ship.to_string(),
            qty_ordered: 2,
            qty_returned: 1,
            total_price: Some(price),
        };
        Dataset::new(
            [
                columns::ORDER_DATE,
                columns::ORDER_RELEASE_DATE,
                columns::DATE_SHIPPED,
                columns::ITEM_ID,
                columns::CUSTOMER_ID,
                columns::SHIP_CODE,
                columns::QTY_ORDERED,
                columns::QTY_RETURNED,
                columns::TOTAL_PRICE,
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            vec![
                record("I1", "C1", "UPS", 10.0),
                record("I2", "C2", "DHL", 20.0),
                record("I1", "C2", "UPS", 5.0),
            ],
        )
    }

    fn app() -> App {
        let session = ChatSession::new(
            DataManager::from_dataset(dataset()),
            Responder::default(),
            Box::new(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())),
        );
        App::new("dark", session, "UTC".to_string())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_and_submit(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_app_creation_defaults() {
        let app = app();
        assert!(app.input.is_empty());
        assert_eq!(app.scroll_back, 0);
        assert!(!app.should_quit);
        assert!(app.session.transcript().is_empty());
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut app = app();
        for c in "totl".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.input, "tot");
    }

    #[test]
    fn test_enter_submits_and_clears_input() {
        let mut app = app();
        type_and_submit(&mut app, "total sales");
        assert!(app.input.is_empty());
        let msgs = app.session.transcript().messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].content, "**Total Sales:** `$35.00`");
    }

    #[test]
    fn test_enter_on_blank_input_does_nothing() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.session.transcript().is_empty());
    }

    #[test]
    fn test_scroll_keys() {
        let mut app = app();
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.scroll_back, 11);
        app.handle_key(key(KeyCode::PageDown));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.scroll_back, 0);

        app.handle_key(key(KeyCode::Up));
        type_and_submit(&mut app, "help");
        assert_eq!(app.scroll_back, 0);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);

        let mut other = self::app();
        other.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(other.should_quit);
        assert!(other.input.is_empty());
    }

    #[test]
    fn test_render_initial_screen() {
        let screen = draw(&app());
        assert!(screen.contains("BI ASSISTANT"));
        assert!(screen.contains("3 rows"));
        assert!(screen.contains("Nothing to show yet"));
    }

    #[test]
    fn test_render_with_table_and_chart_attachments() {
        let mut app = app();
        type_and_submit(&mut app, "top selling items");
        let screen = draw(&app);
        assert!(screen.contains("Item ID by Total Price"));

        type_and_submit(&mut app, "pie chart of shipping method used the most");
        let screen = draw(&app);
        assert!(screen.contains("Most Used Shipping Methods"));

        type_and_submit(&mut app, "monthly sales trend");
        draw(&app);
        type_and_submit(&mut app, "graph top customers by spending");
        draw(&app);
    }

    #[test]
    fn test_render_shows_load_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let session = ChatSession::new(
            DataManager::new(Some(dir.path().join("missing.csv"))),
            Responder::default(),
            Box::new(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())),
        );
        let mut app = App::new("classic", session, "UTC".to_string());
        type_and_submit(&mut app, "total sales");
        let screen = draw(&app);
        assert!(screen.contains("Data load failed"));
        assert!(screen.contains("missing.csv"));
    }
}
