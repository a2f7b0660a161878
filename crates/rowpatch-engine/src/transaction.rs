//! Scoped transaction acquisition
//!
//! A [`TransactionScope`] owns the connection for the lifetime of one batch.
//! It is consumed by exactly one of [`TransactionScope::commit`],
//! [`TransactionScope::rollback`] or [`TransactionScope::abort`], and each of
//! them closes the connection before returning.

#![allow(clippy::result_large_err)]

use rowpatch_core::ExError;
use rowpatch_store::errors::Result;
use rowpatch_store::SqlConnection;

/// An open transaction on a connection owned by the scope
pub struct TransactionScope {
    conn: Box<dyn SqlConnection>,
    open: bool,
}

impl TransactionScope {
    /// Issue `BEGIN` on a freshly opened connection
    ///
    /// The connection is closed before a `BEGIN` failure is returned.
    pub async fn begin(mut conn: Box<dyn SqlConnection>) -> Result<Self> {
        if let Err(e) = conn.begin().await {
            close_quietly(conn.as_mut()).await;
            return Err(e);
        }
        tracing::debug!("transaction started");
        Ok(Self { conn, open: true })
    }

    pub fn connection(&mut self) -> &mut dyn SqlConnection {
        self.conn.as_mut()
    }

    /// `COMMIT`; on failure, roll back best-effort and return the commit error
    pub async fn commit(mut self) -> Result<()> {
        let outcome = self.conn.commit().await;
        if let Err(ref e) = outcome {
            tracing::debug!(error = %e, "commit failed, rolling back");
            self.rollback_quietly().await;
        }
        self.open = false;
        close_quietly(self.conn.as_mut()).await;
        outcome
    }

    /// `ROLLBACK` and report its failure
    pub async fn rollback(mut self) -> Result<()> {
        let outcome = self.conn.rollback().await;
        self.open = false;
        close_quietly(self.conn.as_mut()).await;
        outcome
    }

    /// Roll back after a fatal error, swallowing any rollback failure
    ///
    /// Returns the error it was given so callers can `return Err(scope.abort(e).await)`.
    pub async fn abort(mut self, cause: ExError) -> ExError {
        self.rollback_quietly().await;
        self.open = false;
        close_quietly(self.conn.as_mut()).await;
        cause
    }

    async fn rollback_quietly(&mut self) {
        if let Err(e) = self.conn.rollback().await {
            tracing::warn!(error = %e, "best-effort rollback failed");
        }
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        if self.open {
            // Dropping the connection releases it; the database discards the
            // uncommitted transaction.
            tracing::warn!("transaction scope dropped without commit or rollback");
        }
    }
}

async fn close_quietly(conn: &mut dyn SqlConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!(error = %e, "closing connection failed");
    }
}
