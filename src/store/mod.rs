// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Record store for todos and categories.
//!
//! The [`RecordStore`] trait is the narrow interface the dispatcher and the
//! HTTP layer consume; [`SqliteStore`] is the SQLite-backed implementation.
//! Search entry points have default implementations that snapshot the store
//! and delegate to the pure matching functions in [`crate::search`].

use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{Result, TidoError};
use crate::models::{
    Category, SnapshotMetadata, Todo, TodoDraft, TodoSnapshot, SNAPSHOT_VERSION,
};
use crate::search;

/// The four categories seeded when the category set is empty
const DEFAULT_CATEGORIES: [(&str, &str, &str); 4] = [
    ("work", "Work", "#3B82F6"),
    ("personal", "Personal", "#10B981"),
    ("health", "Health", "#EF4444"),
    ("learning", "Learning", "#8B5CF6"),
];

/// Narrow persistence interface consumed by the dispatcher and HTTP layer
pub trait RecordStore: Send + Sync {
    /// All todos, newest first
    fn todos(&self) -> Result<Vec<Todo>>;

    /// All categories, ordered by display name
    fn categories(&self) -> Result<Vec<Category>>;

    /// Full snapshot with metadata for clients
    fn list(&self) -> Result<TodoSnapshot> {
        let todos = self.todos()?;
        let categories = self.categories()?;
        let completed_todos = todos.iter().filter(|t| t.completed).count();
        Ok(TodoSnapshot {
            metadata: SnapshotMetadata {
                last_updated: Utc::now(),
                total_todos: todos.len(),
                completed_todos,
                version: SNAPSHOT_VERSION.to_string(),
            },
            todos,
            categories,
        })
    }

    /// Fetch one todo by id
    fn get(&self, id: &str) -> Result<Option<Todo>>;

    /// Create a todo, assigning id and timestamps
    fn create(&self, draft: TodoDraft) -> Result<Todo>;

    /// Replace a todo's fields, stamping a fresh update timestamp.
    /// Returns `None` when the id does not resolve.
    fn update(&self, todo: Todo) -> Result<Option<Todo>>;

    /// Delete a todo. Returns `false` when the id does not resolve.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Seed the four default categories when the category set is empty.
    /// Idempotent: a non-empty set is left untouched.
    fn ensure_default_categories(&self) -> Result<()>;

    /// Three-tier title search (exact, substring, tokenized OR)
    fn search_title(&self, query: &str) -> Result<Vec<Todo>> {
        Ok(search::resolve_by_title(query, &self.todos()?))
    }

    /// Description search with a tokenized fallback across title too
    fn search_description(&self, query: &str) -> Result<Vec<Todo>> {
        Ok(search::resolve_by_description(query, &self.todos()?))
    }

    /// Broad search across title, description, and category display name
    fn search_smart(&self, query: &str) -> Result<Vec<Todo>> {
        Ok(search::smart_search(
            query,
            &self.todos()?,
            &self.categories()?,
        ))
    }
}

/// SQLite-backed record store.
///
/// A `Mutex<Connection>` serializes access; concurrent edits resolve to
/// last-write-wins at this layer, which is the store's documented model.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| TidoError::Store(format!("Failed to open todo store: {}", e)))?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (used by tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TidoError::Store(format!("Failed to open todo store: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(|e| TidoError::Store(format!("Failed to enable foreign keys: {}", e)))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS todos (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                completed INTEGER NOT NULL DEFAULT 0,
                priority TEXT NOT NULL,
                category_id TEXT NOT NULL REFERENCES categories(id),
                due_date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at);",
        )
        .map_err(|e| TidoError::Store(format!("Failed to create schema: {}", e)))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TidoError::Store("todo store lock poisoned".to_string()))
    }
}

/// Next update stamp: strictly after the previous one even when the wall
/// clock has not advanced between two mutations.
fn next_update_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

fn todo_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<Todo, rusqlite::Error> {
    let priority: String = row.get(4)?;
    let priority = crate::models::Priority::parse(&priority).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown priority: {}", priority).into(),
        )
    })?;

    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        priority,
        category: row.get(5)?,
        due_date: parse_date_from_db(&row.get::<_, String>(6)?, 6)?,
        created_at: parse_datetime_from_db(&row.get::<_, String>(7)?, 7)?,
        updated_at: parse_datetime_from_db(&row.get::<_, String>(8)?, 8)?,
    })
}

/// Parse a DateTime from a database RFC 3339 string, converting errors to rusqlite errors
fn parse_datetime_from_db(
    timestamp: &str,
    column: usize,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Parse a date-only column, converting errors to rusqlite errors
fn parse_date_from_db(
    date: &str,
    column: usize,
) -> std::result::Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

const TODO_COLUMNS: &str =
    "id, title, description, completed, priority, category_id, due_date, created_at, updated_at";

impl RecordStore for SqliteStore {
    fn todos(&self) -> Result<Vec<Todo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM todos ORDER BY created_at DESC, id",
            TODO_COLUMNS
        ))?;
        let todos = stmt
            .query_map([], todo_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    fn categories(&self) -> Result<Vec<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, color FROM categories ORDER BY name")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn get(&self, id: &str) -> Result<Option<Todo>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM todos WHERE id = ?1",
            TODO_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![id], todo_from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn create(&self, draft: TodoDraft) -> Result<Todo> {
        if draft.title.trim().is_empty() {
            return Err(TidoError::InvalidInput(
                "Todo title must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            priority: draft.priority,
            category: draft.category,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO todos (id, title, description, completed, priority, category_id, due_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                todo.id,
                todo.title,
                todo.description,
                todo.completed,
                todo.priority.as_str(),
                todo.category,
                todo.due_date.format("%Y-%m-%d").to_string(),
                todo.created_at.to_rfc3339(),
                todo.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(id = %todo.id, title = %todo.title, "created todo");
        Ok(todo)
    }

    fn update(&self, todo: Todo) -> Result<Option<Todo>> {
        if todo.title.trim().is_empty() {
            return Err(TidoError::InvalidInput(
                "Todo title must not be empty".to_string(),
            ));
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM todos WHERE id = ?1",
            TODO_COLUMNS
        ))?;
        let existing = {
            let mut rows = stmt.query_map(params![todo.id], todo_from_row)?;
            match rows.next() {
                Some(row) => row?,
                None => return Ok(None),
            }
        };
        drop(stmt);

        // Timestamps stay store-assigned: created_at is preserved and
        // updated_at strictly increases on every write.
        let updated = Todo {
            created_at: existing.created_at,
            updated_at: next_update_stamp(existing.updated_at),
            ..todo
        };

        conn.execute(
            "UPDATE todos SET title = ?1, description = ?2, completed = ?3, priority = ?4,
                 category_id = ?5, due_date = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                updated.title,
                updated.description,
                updated.completed,
                updated.priority.as_str(),
                updated.category,
                updated.due_date.format("%Y-%m-%d").to_string(),
                updated.updated_at.to_rfc3339(),
                updated.id,
            ],
        )?;

        tracing::debug!(id = %updated.id, title = %updated.title, "updated todo");
        Ok(Some(updated))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        if affected > 0 {
            tracing::debug!(id = %id, "deleted todo");
        }
        Ok(affected > 0)
    }

    fn ensure_default_categories(&self) -> Result<()> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        for (id, name, color) in DEFAULT_CATEGORIES {
            conn.execute(
                "INSERT INTO categories (id, name, color) VALUES (?1, ?2, ?3)",
                params![id, name, color],
            )?;
        }
        tracing::info!("seeded default categories");
        Ok(())
    }
}
