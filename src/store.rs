//! Persistent SQLite store for callback requests.
//!
//! Both binaries open the same database file. Rows are created by the web
//! intake service, mutated (processed flag only) by the admin bot, and never
//! deleted.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, params};
use tracing::info;

/// Errors surfaced by the lead store. Callers report a generic failure to
/// their own caller instead of crashing.
#[derive(Debug)]
pub enum StoreError {
    /// Failed to open the database file.
    Open { path: PathBuf, source: rusqlite::Error },
    /// A query or write failed.
    Query(rusqlite::Error),
    /// No lead with the given id exists.
    NotFound(i64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open lead store '{}': {}", path.display(), source)
            }
            Self::Query(source) => write!(f, "lead store query failed: {}", source),
            Self::NotFound(id) => write!(f, "no lead with id {}", id),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Query(source) => Some(source),
            Self::NotFound(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Query(e)
    }
}

/// Lesson category offered by the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonType {
    IndividualOnline,
    GroupOnline,
    Unsure,
}

impl LessonType {
    /// Parse a form value. Returns `None` for anything outside the known set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual_online" => Some(Self::IndividualOnline),
            "group_online" => Some(Self::GroupOnline),
            "unsure" => Some(Self::Unsure),
            _ => None,
        }
    }

    /// Stable identifier used in forms and in the database column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndividualOnline => "individual_online",
            Self::GroupOnline => "group_online",
            Self::Unsure => "unsure",
        }
    }

    /// Human-readable label for notifications and pages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::IndividualOnline => "Individual online",
            Self::GroupOnline => "Group online",
            Self::Unsure => "Not sure yet",
        }
    }
}

/// A validated submission, ready to persist.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub lesson_type: LessonType,
}

/// One persisted callback request.
#[derive(Debug, Clone)]
pub struct CallbackRequest {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub lesson_type: LessonType,
    /// UTC timestamp, `%Y-%m-%d %H:%M:%S`, set once at insert time.
    pub created_at: String,
    pub processed: bool,
}

/// SQLite-backed lead store.
pub struct LeadStore {
    conn: Mutex<Connection>,
}

impl LeadStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema()?;

        let (total, unprocessed) = store.counts()?;
        info!("Opened lead store at {:?} ({} leads, {} unprocessed)", path, total, unprocessed);
        Ok(store)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS callbacks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT,
                phone TEXT NOT NULL,
                lesson_type TEXT NOT NULL,
                created_at TEXT NOT NULL,
                processed INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_callbacks_created_at ON callbacks(created_at);
            "#,
        )?;
        Ok(())
    }

    fn counts(&self) -> Result<(u64, u64), StoreError> {
        let conn = self.conn.lock().unwrap();
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM callbacks", [], |row| row.get(0))?;
        let unprocessed: i64 = conn.query_row(
            "SELECT COUNT(*) FROM callbacks WHERE processed = 0",
            [],
            |row| row.get(0),
        )?;
        Ok((total as u64, unprocessed as u64))
    }

    /// Insert a new lead and return its id. `created_at` is set from the
    /// server clock; `processed` starts false.
    pub fn insert(&self, lead: &NewLead) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        conn.execute(
            "INSERT INTO callbacks (name, email, phone, lesson_type, created_at, processed)
             VALUES (?1, ?2, ?3, ?4, ?5, 0)",
            params![lead.name, lead.email, lead.phone, lead.lesson_type.as_str(), created_at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// One page of leads, newest first, plus the total row count.
    pub fn list_page(&self, offset: u64, limit: u64) -> Result<(Vec<CallbackRequest>, u64), StoreError> {
        let conn = self.conn.lock().unwrap();
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM callbacks", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT id, name, email, phone, lesson_type, created_at, processed
             FROM callbacks ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit as i64, offset as i64], row_to_lead)?;

        let mut leads = Vec::new();
        for row in rows {
            leads.push(row?);
        }
        Ok((leads, total as u64))
    }

    /// Set the processed flag on a lead. The only mutation the system ever
    /// performs after insert.
    pub fn set_processed(&self, id: i64, processed: bool) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE callbacks SET processed = ?2 WHERE id = ?1",
            params![id, processed],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Fetch a single lead by id.
    pub fn get(&self, id: i64) -> Result<Option<CallbackRequest>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, email, phone, lesson_type, created_at, processed
             FROM callbacks WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], row_to_lead)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}

fn row_to_lead(row: &rusqlite::Row<'_>) -> rusqlite::Result<CallbackRequest> {
    let lesson_raw: String = row.get(4)?;
    Ok(CallbackRequest {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        // Rows are only ever written through insert(), which takes the enum.
        lesson_type: LessonType::parse(&lesson_raw).unwrap_or(LessonType::Unsure),
        created_at: row.get(5)?,
        processed: row.get(6)?,
    })
}
