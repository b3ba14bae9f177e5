//! Test utilities for the snippetbox crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, SubsecRound, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{LATEST_SNIPPETS_LIMIT, SnippetRepository, SnippetRepositoryError};
use crate::domain::{NewSnippet, Snippet, SnippetId};

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The crate avoids direct `std::fs` calls. These helpers build on
    //! `cap_std::fs::Dir` so test suites share consistent file access.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write bytes to a file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use snippetbox::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("snippetbox-cap-fs-write.txt");
    /// write_file(&path, b"{{ current_year }}\n")?;
    /// assert_eq!(read_file_to_string(&path)?, "{{ current_year }}\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Read a UTF-8 text file through `cap_std`.
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

/// Directory holding the shipped HTML templates.
pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ui").join("html")
}

/// Directory holding the shipped static assets.
pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ui").join("static")
}

/// Clock frozen at a chosen instant until advanced explicitly.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Snippet store held in memory with the same visibility rules as the
/// PostgreSQL adapter.
///
/// Expired rows are kept and hidden, so advancing the clock makes snippets
/// disappear from reads exactly as they would in the database.
pub struct InMemorySnippetRepository {
    clock: Arc<dyn Clock>,
    rows: Mutex<Vec<Snippet>>,
}

impl InMemorySnippetRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored rows, live or expired.
    pub fn stored(&self) -> usize {
        self.lock_rows().len()
    }

    fn lock_rows(&self) -> MutexGuard<'_, Vec<Snippet>> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("snippet store mutex"),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(6)
    }
}

#[async_trait]
impl SnippetRepository for InMemorySnippetRepository {
    async fn insert(&self, snippet: &NewSnippet) -> Result<SnippetId, SnippetRepositoryError> {
        let created = self.now();
        let expires = TimeDelta::try_days(i64::from(snippet.retention_days))
            .and_then(|retention| created.checked_add_signed(retention))
            .ok_or_else(|| SnippetRepositoryError::query("retention out of range"))?;

        let mut rows = self.lock_rows();
        let raw_id = i32::try_from(rows.len() + 1)
            .map_err(|_| SnippetRepositoryError::query("snippet id space exhausted"))?;
        let id = SnippetId::from_store(raw_id);
        rows.push(Snippet {
            id,
            title: snippet.title.clone(),
            content: snippet.content.clone(),
            created,
            expires,
        });
        Ok(id)
    }

    async fn get(&self, id: SnippetId) -> Result<Snippet, SnippetRepositoryError> {
        let now = self.now();
        self.lock_rows()
            .iter()
            .find(|row| row.id == id && row.is_live_at(now))
            .cloned()
            .ok_or_else(SnippetRepositoryError::no_record)
    }

    async fn latest(&self) -> Result<Vec<Snippet>, SnippetRepositoryError> {
        let now = self.now();
        let mut live: Vec<Snippet> = self
            .lock_rows()
            .iter()
            .filter(|row| row.is_live_at(now))
            .cloned()
            .collect();
        live.sort_by(|a, b| (b.created, b.id.get()).cmp(&(a.created, a.id.get())));
        live.truncate(LATEST_SNIPPETS_LIMIT);
        Ok(live)
    }
}
