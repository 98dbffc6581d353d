//! [`PaymentStats`] definition.

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Application;
use crate::{
    domain::payment::Ledger,
    infra::{database, Database},
    read::{self, Totals},
    Query, Service,
};

/// [`Query`] reducing the payments of a [`Ledger`] into its [`Totals`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PaymentStats {
    /// [`Ledger`] to reduce.
    pub ledger: Ledger,
}

impl<Db> Query<PaymentStats> for Service<Db>
where
    Db: Database<
        Select<By<Vec<read::payment::Row>, Ledger>>,
        Ok = Vec<read::payment::Row>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Totals;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        PaymentStats { ledger }: PaymentStats,
    ) -> Result<Self::Ok, Self::Err> {
        let rows = self
            .database()
            .execute(Select(By::new(ledger)))
            .await
            .map_err(tracerr::wrap!())?;

        log::debug!(
            "summarizing {} `{}` payment rows of `{}`",
            rows.len(),
            ledger.name,
            ledger.table,
        );
        Ok(Totals::summarize(&ledger, rows))
    }
}
