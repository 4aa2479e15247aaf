use std::collections::VecDeque;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::controller::{AddOutcome, LibraryController, Notice, Notify};
use crate::models::Book;

use super::forms::{input_line, push_text_char, BookField, BookForm};
use super::helpers::{centered_rect, notice_chrome, step_selection};

const WINDOW_TITLE: &str = "Library Management System";
/// Two input lines plus borders.
const FORM_HEIGHT: u16 = 4;
const SEARCH_HEIGHT: u16 = 3;
/// Footer space reserved for key instructions.
const FOOTER_HEIGHT: u16 = 2;
const PAGE_ROWS: isize = 10;

/// Which widget receives typed keys.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Focus {
    Title,
    Author,
    Search,
    Table,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Title => Focus::Author,
            Focus::Author => Focus::Search,
            Focus::Search => Focus::Table,
            Focus::Table => Focus::Title,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Title => Focus::Table,
            Focus::Author => Focus::Title,
            Focus::Search => Focus::Author,
            Focus::Table => Focus::Search,
        }
    }

    fn form_field(self) -> Option<BookField> {
        match self {
            Focus::Title => Some(BookField::Title),
            Focus::Author => Some(BookField::Author),
            _ => None,
        }
    }
}

/// Notices waiting to be acknowledged. The front one is shown as a popup and
/// swallows input until dismissed.
#[derive(Default)]
struct PendingNotices(VecDeque<Notice>);

impl Notify for PendingNotices {
    fn notify(&mut self, notice: Notice) {
        self.0.push_back(notice);
    }
}

/// Central application state for the TUI.
pub struct App {
    controller: LibraryController,
    form: BookForm,
    search: String,
    focus: Focus,
    table: TableState,
    notices: PendingNotices,
}

impl App {
    /// Wrap a controller and load the initial book list.
    pub fn new(controller: LibraryController) -> Self {
        let mut app = Self {
            controller,
            form: BookForm::default(),
            search: String::new(),
            focus: Focus::Title,
            table: TableState::default(),
            notices: PendingNotices::default(),
        };
        app.refresh();
        app
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if !self.notices.0.is_empty() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notices.0.pop_front();
            }
            return false;
        }

        match code {
            KeyCode::F(5) => {
                self.refresh();
                return false;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return false;
            }
            _ => {}
        }

        match self.focus {
            Focus::Title | Focus::Author => {
                self.handle_form_key(code);
                false
            }
            Focus::Search => {
                self.handle_search_key(code);
                false
            }
            Focus::Table => self.handle_table_key(code),
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Some(field) = self.focus.form_field() else {
            return;
        };
        match code {
            KeyCode::Enter => self.add_book(),
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Backspace => self.form.backspace(field),
            KeyCode::Char(ch) => {
                self.form.push_char(field, ch);
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let selected_id = self.selected_book().map(|book| book.id);
                self.controller.search(&self.search, &mut self.notices);
                self.sync_selection(selected_id);
            }
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Backspace => {
                self.search.pop();
            }
            KeyCode::Char(ch) => {
                push_text_char(&mut self.search, ch);
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_ROWS),
            KeyCode::PageDown => self.move_selection(PAGE_ROWS),
            KeyCode::Home => {
                if !self.controller.view().is_empty() {
                    self.table.select(Some(0));
                }
            }
            KeyCode::End => {
                let len = self.controller.view().len();
                if len > 0 {
                    self.table.select(Some(len - 1));
                }
            }
            KeyCode::Char('b') => {
                let selected_id = self.selected_book().map(|book| book.id);
                self.controller
                    .borrow(self.table.selected(), &mut self.notices);
                self.sync_selection(selected_id);
            }
            KeyCode::Char('r') => {
                let selected_id = self.selected_book().map(|book| book.id);
                self.controller
                    .return_book(self.table.selected(), &mut self.notices);
                self.sync_selection(selected_id);
            }
            KeyCode::Char('a') => self.focus = Focus::Title,
            KeyCode::Char('/') => self.focus = Focus::Search,
            _ => {}
        }
        false
    }

    fn add_book(&mut self) {
        let outcome = self
            .controller
            .add_book(&self.form.title, &self.form.author, &mut self.notices);
        if let AddOutcome::Added(id) = outcome {
            self.form.clear();
            self.focus = Focus::Title;
            self.sync_selection(Some(id));
        }
    }

    fn refresh(&mut self) {
        let selected_id = self.selected_book().map(|book| book.id);
        self.controller.refresh(&mut self.notices);
        self.sync_selection(selected_id);
    }

    /// Re-point the selection after the rows were rebuilt: stay on the same
    /// book when it is still listed, otherwise clamp to the last row.
    fn sync_selection(&mut self, focus_id: Option<i64>) {
        let view = self.controller.view();
        if view.is_empty() {
            self.table.select(None);
            return;
        }

        if let Some(index) = focus_id.and_then(|id| view.position(id)) {
            self.table.select(Some(index));
            return;
        }

        if let Some(selected) = self.table.selected() {
            if selected >= view.len() {
                self.table.select(Some(view.len() - 1));
            }
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let next = step_selection(self.table.selected(), offset, self.controller.view().len());
        self.table.select(next);
    }

    fn selected_book(&self) -> Option<&Book> {
        self.table
            .selected()
            .and_then(|index| self.controller.view().get(index))
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let outer = Block::default().borders(Borders::ALL).title(WINDOW_TITLE);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FORM_HEIGHT),
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(inner);

        self.draw_form(frame, chunks[0]);
        self.draw_search(frame, chunks[1]);
        self.draw_table(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if let Some(notice) = self.notices.0.front() {
            draw_notice(frame, area, notice);
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Add New Book");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            self.form
                .build_line("Title", BookField::Title, self.focus == Focus::Title),
            self.form
                .build_line("Author", BookField::Author, self.focus == Focus::Author),
        ];
        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(field) = self.focus.form_field() {
            let (prefix, row) = match field {
                BookField::Title => ("Title: ", 0),
                BookField::Author => ("Author: ", 1),
            };
            let value_len = Span::raw(self.form.value(field)).width() as u16;
            frame.set_cursor_position((inner.x + prefix.len() as u16 + value_len, inner.y + row));
        }
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Search");
        let inner = block.inner(area);
        let active = self.focus == Focus::Search;
        let line = input_line("Search", &self.search, active, "title or author");
        frame.render_widget(Paragraph::new(line).block(block), area);

        if active {
            let cursor_x =
                inner.x + "Search: ".len() as u16 + Span::raw(self.search.as_str()).width() as u16;
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Book ID", "Title", "Author", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.controller.view().books.iter().map(|book| {
            let status = book.status();
            let status_style = if book.is_borrowed {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Green)
            };
            Row::new(vec![
                Cell::from(book.id.to_string()),
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
                Cell::from(Span::styled(status.label(), status_style)),
            ])
        });

        let border_style = if self.focus == Focus::Table {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Percentage(45),
                Constraint::Percentage(35),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Books"),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

        frame.render_stateful_widget(table, area, &mut self.table);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.footer_instructions()).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match self.focus {
            Focus::Title | Focus::Author => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Add Book   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[F5]", key_style),
                Span::raw(" Refresh   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Books"),
            ]),
            Focus::Search => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[F5]", key_style),
                Span::raw(" Refresh   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Books"),
            ]),
            Focus::Table => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[b]", key_style),
                Span::raw(" Borrow   "),
                Span::styled("[r]", key_style),
                Span::raw(" Return   "),
                Span::styled("[a]", key_style),
                Span::raw(" Add   "),
                Span::styled("[/]", key_style),
                Span::raw(" Search   "),
                Span::styled("[F5]", key_style),
                Span::raw(" Refresh   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }
}

fn draw_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    let popup_area = centered_rect(60, 30, area);
    frame.render_widget(Clear, popup_area);

    let (title, style) = notice_chrome(notice.kind);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style);

    let lines = vec![
        Line::from(notice.text.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to dismiss",
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}
