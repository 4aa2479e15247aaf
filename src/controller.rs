//! Glue between user actions and the four store operations. The controller
//! owns the rows currently on screen and reports every outcome through a
//! [`Notify`] implementation, synchronously, before returning to the caller.

use tracing::{info, warn};

use crate::db::{self, ConnectionFactory};
use crate::error::StoreError;
use crate::models::{Book, BookStatus};

/// Severity of a notice shown to the user.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    /// User mistakes: empty fields, no selection, wrong status.
    Warning,
    /// A store operation failed.
    Error,
}

/// A message shown to the user after an action completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    /// Name the failing operation and append the store's own message.
    pub fn store_failure(operation: &str, err: &StoreError) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: format!("Error {operation}: {err}"),
        }
    }
}

/// Receives notices as actions complete.
pub trait Notify {
    fn notify(&mut self, notice: Notice);
}

impl Notify for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Rows bound to the table. Replaced wholesale on every successful reload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub books: Vec<Book>,
}

impl ViewState {
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    /// Row index of the book with `id`, if it is on screen.
    pub fn position(&self, id: i64) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}

/// Whether an add action went through. The UI clears its form only on
/// `Added`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(i64),
    Rejected,
}

/// Runs user actions against the store and keeps the table rows current.
pub struct LibraryController {
    factory: Box<dyn ConnectionFactory>,
    view: ViewState,
}

impl LibraryController {
    pub fn new(factory: Box<dyn ConnectionFactory>) -> Self {
        Self {
            factory,
            view: ViewState::default(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Reload the full list. On failure the current rows stay in place.
    pub fn refresh(&mut self, notify: &mut dyn Notify) -> bool {
        match db::list_all(self.factory.as_ref()) {
            Ok(books) => {
                self.view = ViewState { books };
                true
            }
            Err(err) => {
                warn!(error = %err, "loading books failed");
                notify.notify(Notice::store_failure("loading books", &err));
                false
            }
        }
    }

    pub fn add_book(&mut self, title: &str, author: &str, notify: &mut dyn Notify) -> AddOutcome {
        let title = title.trim();
        let author = author.trim();
        if title.is_empty() || author.is_empty() {
            notify.notify(Notice::warning("Please enter both title and author."));
            return AddOutcome::Rejected;
        }

        match db::insert(self.factory.as_ref(), title, author) {
            Ok(book) => {
                info!(id = book.id, title, author, "added book");
                notify.notify(Notice::info("Book added successfully."));
                self.refresh(notify);
                AddOutcome::Added(book.id)
            }
            Err(err) => {
                warn!(error = %err, "adding book failed");
                notify.notify(Notice::store_failure("adding book", &err));
                AddOutcome::Rejected
            }
        }
    }

    /// Filter the table. A blank query is a plain refresh.
    pub fn search(&mut self, query: &str, notify: &mut dyn Notify) {
        if query.trim().is_empty() {
            self.refresh(notify);
            return;
        }

        match db::search(self.factory.as_ref(), query) {
            Ok(books) => self.view = ViewState { books },
            Err(err) => {
                warn!(error = %err, "searching books failed");
                notify.notify(Notice::store_failure("searching books", &err));
            }
        }
    }

    /// Lend out the book on row `selected`.
    pub fn borrow(&mut self, selected: Option<usize>, notify: &mut dyn Notify) {
        let Some(book) = selected.and_then(|index| self.view.get(index)) else {
            notify.notify(Notice::warning("Please select a book to borrow."));
            return;
        };
        if book.status() == BookStatus::Borrowed {
            notify.notify(Notice::warning("Book is already borrowed."));
            return;
        }

        let id = book.id;
        self.update_borrowed(id, true, notify);
    }

    /// Take back the book on row `selected`.
    pub fn return_book(&mut self, selected: Option<usize>, notify: &mut dyn Notify) {
        let Some(book) = selected.and_then(|index| self.view.get(index)) else {
            notify.notify(Notice::warning("Please select a book to return."));
            return;
        };
        if book.status() == BookStatus::Available {
            notify.notify(Notice::warning("Book is not borrowed."));
            return;
        }

        let id = book.id;
        self.update_borrowed(id, false, notify);
    }

    fn update_borrowed(&mut self, id: i64, borrowed: bool, notify: &mut dyn Notify) {
        match db::set_borrowed(self.factory.as_ref(), id, borrowed) {
            Ok(true) => {
                info!(id, borrowed, "changed borrow status");
                let text = if borrowed {
                    "Book borrowed successfully."
                } else {
                    "Book returned successfully."
                };
                notify.notify(Notice::info(text));
                self.refresh(notify);
            }
            Ok(false) => {
                warn!(id, "borrow status update matched no book");
                notify.notify(Notice::warning("Book not found."));
            }
            Err(err) => {
                warn!(error = %err, id, "updating book status failed");
                notify.notify(Notice::store_failure("updating book status", &err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use rusqlite::Connection;
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::db::SqliteConnector;

    /// Wraps the real connector, counting connections and optionally failing
    /// every one of them.
    struct ProbeFactory {
        inner: SqliteConnector,
        connects: Rc<Cell<usize>>,
        broken: Rc<Cell<bool>>,
    }

    impl ConnectionFactory for ProbeFactory {
        fn connect(&self) -> Result<Connection, StoreError> {
            self.connects.set(self.connects.get() + 1);
            if self.broken.get() {
                return Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery));
            }
            self.inner.connect()
        }
    }

    struct Harness {
        _dir: TempDir,
        controller: LibraryController,
        connects: Rc<Cell<usize>>,
        broken: Rc<Cell<bool>>,
        notices: Vec<Notice>,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let inner = SqliteConnector::open(dir.path().join("library.sqlite")).unwrap();
            let connects = Rc::new(Cell::new(0));
            let broken = Rc::new(Cell::new(false));
            let factory = ProbeFactory {
                inner,
                connects: Rc::clone(&connects),
                broken: Rc::clone(&broken),
            };
            Self {
                _dir: dir,
                controller: LibraryController::new(Box::new(factory)),
                connects,
                broken,
                notices: Vec::new(),
            }
        }

        fn add(&mut self, title: &str, author: &str) -> AddOutcome {
            self.controller.add_book(title, author, &mut self.notices)
        }

        fn last_text(&self) -> &str {
            &self.notices.last().unwrap().text
        }
    }

    #[test]
    fn add_inserts_and_reloads() {
        let mut h = Harness::new();
        let outcome = h.add("  Dune ", "Herbert");

        let AddOutcome::Added(id) = outcome else {
            panic!("expected book to be added");
        };
        let view = h.controller.view();
        assert_eq!(view.len(), 1);
        assert_eq!(view.books[0].id, id);
        assert_eq!(view.books[0].title, "Dune");
        assert!(!view.books[0].is_borrowed);
        assert_eq!(h.notices, vec![Notice::info("Book added successfully.")]);
    }

    #[test]
    fn add_with_blank_field_never_reaches_the_store() {
        let mut h = Harness::new();
        assert_eq!(h.add("Dune", "   "), AddOutcome::Rejected);
        assert_eq!(h.add("", "Herbert"), AddOutcome::Rejected);

        assert_eq!(h.connects.get(), 0);
        assert_eq!(h.notices.len(), 2);
        assert!(h
            .notices
            .iter()
            .all(|n| *n == Notice::warning("Please enter both title and author.")));
    }

    #[test]
    fn search_filters_and_blank_search_restores() {
        let mut h = Harness::new();
        h.add("Dune", "Herbert");
        h.add("Emma", "Austen");

        h.controller.search("DUNE", &mut h.notices);
        assert_eq!(h.controller.view().len(), 1);
        assert_eq!(h.controller.view().books[0].title, "Dune");

        h.controller.search("  ", &mut h.notices);
        assert_eq!(h.controller.view().len(), 2);
    }

    #[test]
    fn borrow_then_return_round_trip() {
        let mut h = Harness::new();
        h.add("Dune", "Herbert");
        let original = h.controller.view().books[0].clone();

        h.controller.borrow(Some(0), &mut h.notices);
        assert_eq!(h.last_text(), "Book borrowed successfully.");
        let borrowed = h.controller.view().books[0].clone();
        assert_eq!(borrowed.status(), BookStatus::Borrowed);

        h.controller.return_book(Some(0), &mut h.notices);
        assert_eq!(h.last_text(), "Book returned successfully.");
        assert_eq!(h.controller.view().books[0], original);
        assert_eq!(
            Book {
                is_borrowed: false,
                ..borrowed
            },
            original
        );
    }

    #[test]
    fn borrowing_a_borrowed_book_skips_the_store() {
        let mut h = Harness::new();
        h.add("Dune", "Herbert");
        h.controller.borrow(Some(0), &mut h.notices);

        let before = h.connects.get();
        h.controller.borrow(Some(0), &mut h.notices);
        assert_eq!(h.connects.get(), before);
        assert_eq!(h.notices.last(), Some(&Notice::warning("Book is already borrowed.")));
    }

    #[test]
    fn returning_an_available_book_skips_the_store() {
        let mut h = Harness::new();
        h.add("Dune", "Herbert");

        let before = h.connects.get();
        h.controller.return_book(Some(0), &mut h.notices);
        assert_eq!(h.connects.get(), before);
        assert_eq!(h.last_text(), "Book is not borrowed.");
    }

    #[test]
    fn missing_selection_is_a_warning() {
        let mut h = Harness::new();
        h.add("Dune", "Herbert");

        h.controller.borrow(None, &mut h.notices);
        assert_eq!(h.last_text(), "Please select a book to borrow.");
        h.controller.return_book(Some(7), &mut h.notices);
        assert_eq!(h.last_text(), "Please select a book to return.");
    }

    #[test]
    fn book_removed_behind_our_back_is_not_found() {
        let mut h = Harness::new();
        h.add("Dune", "Herbert");
        h.controller
            .factory
            .connect()
            .unwrap()
            .execute("DELETE FROM books", [])
            .unwrap();

        h.controller.borrow(Some(0), &mut h.notices);
        assert_eq!(h.notices.last(), Some(&Notice::warning("Book not found.")));
        assert_eq!(h.controller.view().len(), 1);
    }

    #[test]
    fn store_failure_leaves_table_untouched() {
        let mut h = Harness::new();
        h.add("Dune", "Herbert");
        let snapshot = h.controller.view().clone();

        h.broken.set(true);
        h.controller.borrow(Some(0), &mut h.notices);
        assert_eq!(h.notices.last().unwrap().kind, NoticeKind::Error);
        assert!(h.last_text().starts_with("Error updating book status: "));

        h.controller.search("dune", &mut h.notices);
        assert!(h.last_text().starts_with("Error searching books: "));

        assert!(!h.controller.refresh(&mut h.notices));
        assert!(h.last_text().starts_with("Error loading books: "));

        assert_eq!(h.add("Emma", "Austen"), AddOutcome::Rejected);
        assert!(h.last_text().starts_with("Error adding book: "));

        assert_eq!(h.controller.view(), &snapshot);
    }
}
