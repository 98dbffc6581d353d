//! HTTP API definitions.

pub mod application;
pub mod geojson;
pub mod payment;
pub mod user;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::define_error;

/// Name of the [`tracing::Span`] of the API endpoints.
pub(crate) const SPAN_NAME: &str = "API endpoint";

/// Creates a new [`Router`] serving all the API endpoints under `/api`.
///
/// [`Service`] is expected to be provided as an [`Extension`].
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
#[must_use]
pub fn router() -> Router {
    Router::new().nest(
        "/api",
        Router::new()
            .route("/getGeojson", get(geojson::get_geojson))
            .route("/paymentstatAppsn", get(payment::paymentstat_appsn))
            .route("/paymentstatSurcon", get(payment::paymentstat_surcon))
            .route("/getApplication", get(application::get_application))
            .route("/getApplications", get(application::get_applications))
            .route("/getParcel", get(application::get_parcel))
            .route("/reviewApplication", post(application::review_application))
            .route("/login", post(user::login))
            .route("/me", get(user::me)),
    )
}

/// Successful response wrapping its payload into a `data` field.
#[derive(Clone, Debug, Serialize)]
pub struct Data<T> {
    /// Payload of the response.
    pub data: T,
}

impl<T> From<T> for Data<T> {
    fn from(data: T) -> Self {
        Self { data }
    }
}

define_error! {
    enum PrivilegeError {
        #[code = "NOT_REVIEWER"]
        #[status = UNAUTHORIZED]
        #[message = "Authenticated `User` must be a reviewer"]
        Reviewer,
    }
}
