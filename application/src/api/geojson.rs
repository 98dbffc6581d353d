//! GeoJSON endpoint definitions.

use axum::{
    extract::{rejection::QueryRejection, Query},
    Json,
};
use serde::Deserialize;
use service::{domain::application, query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Query parameters of the [`get_geojson()`] endpoint.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Params {
    /// ID of the only application to render.
    pub id: Option<application::Id>,
}

/// Renders application parcels as a GeoJSON `FeatureCollection`.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_QUERY` - the provided `id` is not an integer;
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(
        api.name = "getGeojson",
        id = ?params.as_ref().ok().and_then(|Query(p)| p.id),
        otel.name = api::SPAN_NAME,
    ),
)]
pub async fn get_geojson(
    ctx: Context,
    params: Result<Query<Params>, QueryRejection>,
) -> Result<Json<read::FeatureCollection>, Error> {
    let Query(Params { id }) = params.map_err(AsError::into_error)?;

    ctx.service()
        .execute(query::Features { id })
        .await
        .map_err(AsError::into_error)
        .map(Json)
}

#[cfg(test)]
mod spec {
    use axum::{extract::Query, response::IntoResponse as _};

    use crate::test_support::{context, json};

    use super::{get_geojson, Params};

    #[tokio::test]
    async fn database_failure_renders_error_only() {
        let res = get_geojson(
            context(&[]).await,
            Ok(Query(Params {
                id: Some(42.into()),
            })),
        )
        .await
        .into_response();

        let (status, body) = json(res).await;
        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("features").is_none());
    }
}
