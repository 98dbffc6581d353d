//! [`Application`]-related [`Database`] implementations.

use common::operations::{By, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{application, Application},
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

/// Columns of an [`Application`] row.
///
/// Geometry is read as text, so it's returned exactly as stored.
const COLUMNS: &str = "\
    id, user_id, geometry::TEXT AS geometry, \
    pillar_type, client_name, address, lga, \
    plan_number, area, surveyor_name, \
    status, payment_status, \
    paid_amount, pillar_payment_fee, pillar_count, misc_fee, \
    created_at, reviewed_by, reviewed_at";

/// Builds an [`Application`] out of a [`Row`] having all the [`COLUMNS`].
///
/// # Errors
///
/// If any column holds a value not representable in an [`Application`].
fn from_row(row: &Row) -> Result<Application, postgres::connection::Error> {
    let reviewed_by = row.try_get::<_, Option<_>>("reviewed_by")?;
    let reviewed_at = row.try_get::<_, Option<_>>("reviewed_at")?;

    Ok(Application {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        geometry: row.try_get("geometry")?,
        pillar_type: row.try_get("pillar_type")?,
        client_name: row.try_get("client_name")?,
        address: row.try_get("address")?,
        lga: row.try_get("lga")?,
        plan_number: row.try_get("plan_number")?,
        area: row.try_get("area")?,
        surveyor_name: row.try_get("surveyor_name")?,
        status: row.try_get("status")?,
        payment_status: row.try_get("payment_status")?,
        paid_amount: row.try_get("paid_amount")?,
        pillar_payment_fee: row.try_get("pillar_payment_fee")?,
        pillar_count: row.try_get("pillar_count")?,
        misc_fee: row.try_get("misc_fee")?,
        created_at: row.try_get("created_at")?,
        review: reviewed_by.zip(reviewed_at).map(|(reviewer_id, reviewed_at)| {
            application::Review {
                reviewer_id,
                reviewed_at,
            }
        }),
    })
}

impl<C> Database<Select<By<Vec<Application>, read::application::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Application>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Application>, read::application::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::application::list::Filter {
            id,
            plan_number,
            user_id,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let id_idx = id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });
        let plan_number_idx = plan_number.as_ref().map(|n| {
            ps.push(n);
            ps.len()
        });
        let user_id_idx = user_id.as_ref().map(|id| {
            ps.push(id);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM applications \
             WHERE true \
                   {id_filtering} \
                   {plan_number_filtering} \
                   {user_id_filtering} \
             ORDER BY id ASC",
            id_filtering = id_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND id = ${idx}::INT8"))
            }),
            plan_number_filtering =
                plan_number_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND plan_number = ${idx}::VARCHAR"))
                }),
            user_id_filtering =
                user_id_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND user_id = ${idx}::UUID"))
                }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect::<Result<_, _>>()
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?)
    }
}

impl<C> Database<Select<By<Option<Application>, application::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Vec<Application>, read::application::list::Filter>>,
        Ok = Vec<Application>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Application>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Application>, application::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = read::application::list::Filter {
            id: Some(by.into_inner()),
            ..read::application::list::Filter::default()
        };
        Ok(self
            .execute(Select(By::<Vec<Application>, _>::new(filter)))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .next())
    }
}

impl<C> Database<Lock<By<Application, application::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Application, application::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: application::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM applications \
            WHERE id = $1::INT8 \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Update<Application>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(application): Update<Application>,
    ) -> Result<Self::Ok, Self::Err> {
        let Application {
            id, status, review, ..
        } = application;
        let reviewed_by = review.map(|r| r.reviewer_id);
        let reviewed_at = review.map(|r| r.reviewed_at);

        const SQL: &str = "\
            UPDATE applications \
            SET status = $2::INT2, \
                reviewed_by = $3::UUID, \
                reviewed_at = $4::TIMESTAMPTZ \
            WHERE id = $1::INT8";
        self.exec(SQL, &[&id, &status, &reviewed_by, &reviewed_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
