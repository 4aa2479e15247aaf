use rusqlite::{params, Row};
use tracing::debug;

use crate::error::StoreError;
use crate::models::Book;

use super::connection::ConnectionFactory;

const SELECT_BOOKS: &str = "SELECT book_id, title, author, is_borrowed FROM books";

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        is_borrowed: row.get(3)?,
    })
}

/// Every book in store-native order, unfiltered.
pub fn list_all(factory: &dyn ConnectionFactory) -> Result<Vec<Book>, StoreError> {
    let conn = factory.connect()?;
    let mut stmt = conn.prepare(SELECT_BOOKS)?;
    let books = stmt
        .query_map([], book_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = books.len(), "listed books");
    Ok(books)
}

/// Insert a new, available book and echo it back with the id the store
/// assigned. Callers reject empty titles and authors before getting here.
pub fn insert(
    factory: &dyn ConnectionFactory,
    title: &str,
    author: &str,
) -> Result<Book, StoreError> {
    let conn = factory.connect()?;
    conn.execute(
        "INSERT INTO books (title, author) VALUES (?1, ?2)",
        params![title, author],
    )?;

    let id = conn.last_insert_rowid();
    debug!(id, "inserted book");
    Ok(Book {
        id,
        title: title.to_string(),
        author: author.to_string(),
        is_borrowed: false,
    })
}

/// Case-insensitive substring match on title or author. A blank query falls
/// back to [`list_all`].
pub fn search(factory: &dyn ConnectionFactory, query: &str) -> Result<Vec<Book>, StoreError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return list_all(factory);
    }

    let pattern = format!("%{needle}%");
    let conn = factory.connect()?;
    let mut stmt = conn.prepare(&format!(
        "{SELECT_BOOKS} WHERE LOWER(title) LIKE ?1 OR LOWER(author) LIKE ?2"
    ))?;
    let books = stmt
        .query_map(params![pattern, pattern], book_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(query = %needle, count = books.len(), "searched books");
    Ok(books)
}

/// Flip the borrow flag for one book. Returns `false` when no row carries the
/// id, which callers report as "not found" rather than as a failure.
pub fn set_borrowed(
    factory: &dyn ConnectionFactory,
    id: i64,
    borrowed: bool,
) -> Result<bool, StoreError> {
    let conn = factory.connect()?;
    let updated = conn.execute(
        "UPDATE books SET is_borrowed = ?1 WHERE book_id = ?2",
        params![borrowed, id],
    )?;

    debug!(id, borrowed, updated, "updated borrow flag");
    Ok(updated > 0)
}
