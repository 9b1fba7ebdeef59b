use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gittree_core::Repository;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tree::{flatten, Builder, Item};

use crate::config::UiConfig;

const HELP: &str = "Navigate branches (Up/Down), Enter to checkout, q to quit.";

/// Anything that can switch the working tree to a branch
pub trait Checkout {
    fn checkout(&self, branch: &str) -> Result<()>;
}

impl Checkout for Repository {
    fn checkout(&self, branch: &str) -> Result<()> {
        Repository::checkout(self, branch)
    }
}

/// Cursor-driven branch list
pub struct App<C: Checkout> {
    items: Vec<Item>,
    state: ListState,
    repo: C,
    message: Option<String>,
    highlight: Color,
    should_quit: bool,
}

impl<C: Checkout> App<C> {
    pub fn new(items: Vec<Item>, repo: C) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }

        Self {
            items,
            state,
            repo,
            message: None,
            highlight: Color::Indexed(205),
            should_quit: false,
        }
    }

    pub fn with_highlight(mut self, highlight: Color) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn selected(&self) -> Option<&Item> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply a single key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(1),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(self.items.len().saturating_sub(1)),
            KeyCode::Enter => self.checkout_selected(),
            _ => {}
        }
    }

    fn quit(&mut self) {
        self.message = None;
        self.should_quit = true;
    }

    fn move_by(&mut self, delta: isize) {
        if let Some(current) = self.state.selected() {
            self.select(current.saturating_add_signed(delta));
        }
    }

    fn select(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        self.state.select(Some(index.min(self.items.len() - 1)));
    }

    fn checkout_selected(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        let Some(branch) = item.checkout_target().map(str::to_string) else {
            self.message = Some("Cannot checkout root node.".to_string());
            return;
        };

        match self.repo.checkout(&branch) {
            Ok(()) => {
                log::info!("checked out {branch}");
                self.message = Some(format!("Checked out {branch}"));
                self.should_quit = true;
            }
            Err(err) => {
                log::warn!("checkout of {branch} failed: {err:#}");
                self.message = Some(format!("Error checking out {branch}: {err:#}"));
            }
        }
    }

    /// Draw the list
    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Help line and spacer
                Constraint::Min(1),    // Branch list
                Constraint::Length(1), // Status message
            ])
            .split(frame.size());

        frame.render_widget(
            Paragraph::new(HELP).style(Style::default().add_modifier(Modifier::BOLD)),
            chunks[0],
        );

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| ListItem::new(Line::from(item.text.as_str())))
            .collect();
        let list = List::new(items)
            .highlight_symbol("> ")
            .highlight_style(
                Style::default()
                    .fg(self.highlight)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(list, chunks[1], &mut self.state);

        if let Some(message) = &self.message {
            frame.render_widget(
                Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red)),
                chunks[2],
            );
        }
    }

    /// Run until the user quits or a checkout succeeds; returns the final message
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<Option<String>> {
        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        Ok(self.message)
    }
}

/// Setup terminal
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore terminal
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Read the repository at `repo_path` and run the interactive branch list
pub fn run_ui(repo_path: &str, config: &UiConfig) -> Result<()> {
    let repo = Repository::open(repo_path).context("failed to open repository")?;
    let snapshot = repo.snapshot()?;

    if snapshot.is_empty() {
        println!("No branches found");
        return Ok(());
    }

    let mut builder = Builder::new(snapshot.relations.clone());
    if config.show_age {
        builder = builder.with_last_commits(snapshot.last_commits());
    }
    let tree = builder
        .build(snapshot.current.as_deref())
        .context("failed to build tree")?;
    let items = flatten(&tree);

    let app = App::new(items, repo).with_highlight(config.highlight_color()?);

    let mut terminal = setup_terminal()?;
    let res = app.run(&mut terminal);
    restore_terminal(&mut terminal)?;

    if let Some(message) = res.context("error running TUI")? {
        println!("{message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingRepo {
        checked_out: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Checkout for RecordingRepo {
        fn checkout(&self, branch: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("working tree has local changes");
            }
            self.checked_out.borrow_mut().push(branch.to_string());
            Ok(())
        }
    }

    fn item(branch: &str, text: &str) -> Item {
        Item {
            branch: branch.to_string(),
            text: text.to_string(),
        }
    }

    fn sample_items() -> Vec<Item> {
        vec![
            item("master*", "master*"),
            item("feature1", "├── feature1"),
            item("feature2", "└── feature2"),
        ]
    }

    fn press(app: &mut App<RecordingRepo>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut app = App::new(sample_items(), RecordingRepo::default());

        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected().map(|i| i.branch.as_str()), Some("master*"));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected().map(|i| i.branch.as_str()), Some("feature2"));

        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected().map(|i| i.branch.as_str()), Some("feature1"));

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.selected().map(|i| i.branch.as_str()), Some("master*"));

        press(&mut app, KeyCode::End);
        assert_eq!(app.selected().map(|i| i.branch.as_str()), Some("feature2"));
    }

    #[test]
    fn test_enter_checks_out_unmarked_branch() {
        let mut app = App::new(sample_items(), RecordingRepo::default());

        press(&mut app, KeyCode::Enter);

        assert_eq!(*app.repo.checked_out.borrow(), vec!["master".to_string()]);
        assert_eq!(app.message(), Some("Checked out master"));
        assert!(app.should_quit());
    }

    #[test]
    fn test_failed_checkout_keeps_running() {
        let repo = RecordingRepo {
            fail: true,
            ..Default::default()
        };
        let mut app = App::new(sample_items(), repo);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.message(),
            Some("Error checking out feature1: working tree has local changes")
        );
        assert!(!app.should_quit());
    }

    #[test]
    fn test_root_is_never_checked_out() {
        let items = vec![item(tree::ROOT_NAME, tree::ROOT_NAME), item("main", "main")];
        let mut app = App::new(items, RecordingRepo::default());

        press(&mut app, KeyCode::Enter);

        assert!(app.repo.checked_out.borrow().is_empty());
        assert_eq!(app.message(), Some("Cannot checkout root node."));
        assert!(!app.should_quit());
    }

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = App::new(sample_items(), RecordingRepo::default());
            press(&mut app, code);
            assert!(app.should_quit());
            assert_eq!(app.message(), None);
        }

        let mut app = App::new(sample_items(), RecordingRepo::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_empty_list_ignores_input() {
        let mut app = App::new(Vec::new(), RecordingRepo::default());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Enter);

        assert!(app.selected().is_none());
        assert!(app.repo.checked_out.borrow().is_empty());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_draw_shows_items_and_cursor() {
        let mut app = App::new(sample_items(), RecordingRepo::default());
        press(&mut app, KeyCode::Down);

        let mut terminal = Terminal::new(TestBackend::new(70, 8)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();

        assert_eq!(rows[0], HELP);
        assert_eq!(rows[2], "  master*");
        assert_eq!(rows[3], "> ├── feature1");
        assert_eq!(rows[4], "  └── feature2");
    }
}
