//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection},
};

/// Postgres database client running all its statements in one transaction.
///
/// The transaction begins on the first statement and lasts until
/// [`Tx::commit()`]. Dropping an uncommitted [`Tx`] rolls it back.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] the transaction's connection is taken from.
    pool: connection::Pool,

    /// Transaction begun on the first statement.
    tx: Arc<RwLock<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client over the provided [`connection::Pool`].
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            tx: Arc::default(),
        }
    }

    /// Returns the transaction of this [`Tx`] client, beginning it if there
    /// is none yet.
    pub(super) async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        super::get_or_init(&self.tx, || self.begin())
            .await
            .map_err(tracerr::wrap!())
    }

    /// Begins a new transaction on a connection taken from the pool.
    async fn begin(&self) -> Result<connection::Tx, Traced<database::Error>> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        connection::Tx::begin(conn).await.map_err(tracerr::wrap!())
    }

    /// Commits the transaction of this [`Tx`] client.
    ///
    /// Does nothing if no statement has been run.
    ///
    /// # Errors
    ///
    /// If the database fails to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.tx.write().await.take() else {
            return Ok(());
        };
        tx.commit().await.map_err(tracerr::wrap!())
    }
}
