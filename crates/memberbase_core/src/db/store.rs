//! Process-local record store.
//!
//! # Responsibility
//! - Own the single in-memory SQLite connection for the process lifetime.
//! - Serialize every read and write behind one mutex.
//!
//! # Invariants
//! - Writes run inside an `IMMEDIATE` transaction; an `Err` from the
//!   closure rolls back every statement it issued.
//! - No two callers observe the connection at the same time, so
//!   read-modify-write sequences inside one closure are atomic.

use super::open::open_db_in_memory;
use super::DbResult;
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction, TransactionBehavior};

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens a fresh, migrated in-memory store.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: Mutex::new(open_db_in_memory()?),
        })
    }

    /// Runs a read-only closure against the connection.
    pub fn read<T, E>(&self, op: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E> {
        let conn = self.conn.lock();
        op(&conn)
    }

    /// Runs a closure inside one transaction and commits on `Ok`.
    ///
    /// The transaction is dropped, and therefore rolled back, when the
    /// closure or the commit fails.
    pub fn write<T, E>(&self, op: impl FnOnce(&Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<rusqlite::Error>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
