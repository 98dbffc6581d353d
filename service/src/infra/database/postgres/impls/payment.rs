//! Payment-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Application;
use crate::{
    domain::payment::Ledger,
    infra::{
        database::{
            self,
            postgres::{self, Connection},
            Postgres,
        },
        Database,
    },
    read,
};

impl<C> Database<Select<By<Vec<read::payment::Row>, Ledger>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::payment::Row>;
    type Err = Traced<database::Error>;

    /// Selects every payment row of the [`Ledger`] joined to its
    /// [`Application`].
    ///
    /// Payment rows without an [`Application`] are skipped.
    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::payment::Row>, Ledger>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Ledger { table, .. } = by.into_inner();

        let sql = format!(
            "SELECT a.id AS application_id, \
                    a.paid_amount, a.pillar_payment_fee, \
                    a.pillar_count, a.misc_fee \
             FROM {table} AS p \
             INNER JOIN applications AS a ON a.id = p.application_id \
             ORDER BY a.id ASC",
        );
        Ok(self
            .query(&sql, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| -> Result<_, postgres::connection::Error> {
                Ok(read::payment::Row {
                    application_id: row.try_get("application_id")?,
                    paid_amount: row.try_get("paid_amount")?,
                    pillar_payment_fee: row.try_get("pillar_payment_fee")?,
                    pillar_count: row.try_get("pillar_count")?,
                    misc_fee: row.try_get("misc_fee")?,
                })
            })
            .collect::<Result<_, _>>()
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?)
    }
}
