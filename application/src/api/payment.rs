//! Payment statistics endpoint definitions.

use axum::Json;
use service::{domain::payment::Ledger, query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Reduces the payments of the provided [`Ledger`] into its totals.
async fn paymentstat(
    ctx: &Context,
    ledger: Ledger,
) -> Result<Json<read::Totals>, Error> {
    ctx.service()
        .execute(query::PaymentStats { ledger })
        .await
        .map_err(AsError::into_error)
        .map(Json)
}

/// Returns the totals of [`Ledger::APPSN`] payments.
///
/// # Errors
///
/// Possible error codes:
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "paymentstatAppsn", otel.name = api::SPAN_NAME),
)]
pub async fn paymentstat_appsn(
    ctx: Context,
) -> Result<Json<read::Totals>, Error> {
    paymentstat(&ctx, Ledger::APPSN).await
}

/// Returns the totals of [`Ledger::SURCON`] payments.
///
/// # Errors
///
/// Possible error codes:
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "paymentstatSurcon", otel.name = api::SPAN_NAME),
)]
pub async fn paymentstat_surcon(
    ctx: Context,
) -> Result<Json<read::Totals>, Error> {
    paymentstat(&ctx, Ledger::SURCON).await
}

#[cfg(test)]
mod spec {
    use axum::response::IntoResponse as _;

    use crate::test_support::{context, json};

    use super::{paymentstat_appsn, paymentstat_surcon};

    #[tokio::test]
    async fn database_failure_renders_error_only() {
        for res in [
            paymentstat_appsn(context(&[]).await).await.into_response(),
            paymentstat_surcon(context(&[]).await).await.into_response(),
        ] {
            let (status, body) = json(res).await;

            assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
            assert_eq!(body.as_object().unwrap().len(), 2);
            assert!(body.get("total_applications").is_none());
        }
    }
}
