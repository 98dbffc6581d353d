//! Application endpoint definitions.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, application, user},
    query, read,
};
use uuid::Uuid;

use crate::{api, define_error, AsError, Context, Error};

/// Land-pillar application as rendered by the API.
#[derive(Clone, Debug, Serialize)]
pub struct Application {
    /// ID of this [`Application`].
    pub id: application::Id,

    /// ID of the user who submitted this [`Application`].
    pub user_id: Option<user::Id>,

    /// GeoJSON geometry of the parcel, verbatim.
    pub geometry: Option<application::Geometry>,

    /// Type of the requested pillars.
    pub pillar_type: Option<application::PillarType>,

    /// Name of the parcel owner.
    pub client_name: Option<application::ClientName>,

    /// Address of the parcel owner.
    pub address: Option<application::Address>,

    /// Local government area of the parcel.
    pub lga: Option<application::Lga>,

    /// Number of the survey plan.
    pub plan_number: Option<application::PlanNumber>,

    /// Area of the parcel.
    pub area: Option<application::Area>,

    /// Name of the surveyor.
    pub surveyor_name: Option<application::SurveyorName>,

    /// Review status, in `SCREAMING_SNAKE_CASE`.
    pub status: String,

    /// Payment status, in `SCREAMING_SNAKE_CASE`.
    pub payment_status: String,

    /// Amount already paid.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub paid_amount: Option<Decimal>,

    /// Fee charged for the pillars.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub pillar_payment_fee: Option<Decimal>,

    /// Number of the requested pillars.
    pub pillar_count: Option<i32>,

    /// Miscellaneous fee.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub misc_fee: Option<Decimal>,

    /// When this [`Application`] was submitted.
    #[serde(serialize_with = "common::datetime::serde::rfc3339::serialize")]
    pub created_at: application::CreationDateTime,

    /// ID of the user who reviewed this [`Application`] last.
    pub reviewed_by: Option<user::Id>,

    /// When this [`Application`] was reviewed last.
    #[serde(
        serialize_with = "common::datetime::serde::rfc3339::serialize_opt"
    )]
    pub reviewed_at: Option<application::ReviewDateTime>,
}

impl From<domain::Application> for Application {
    fn from(application: domain::Application) -> Self {
        let domain::Application {
            id,
            user_id,
            geometry,
            pillar_type,
            client_name,
            address,
            lga,
            plan_number,
            area,
            surveyor_name,
            status,
            payment_status,
            paid_amount,
            pillar_payment_fee,
            pillar_count,
            misc_fee,
            created_at,
            review,
        } = application;

        Self {
            id,
            user_id,
            geometry,
            pillar_type,
            client_name,
            address,
            lga,
            plan_number,
            area,
            surveyor_name,
            status: status.to_string(),
            payment_status: payment_status.to_string(),
            paid_amount,
            pillar_payment_fee,
            pillar_count,
            misc_fee,
            created_at,
            reviewed_by: review.map(|r| r.reviewer_id),
            reviewed_at: review.map(|r| r.reviewed_at),
        }
    }
}

/// Query parameters of the [`get_application()`] endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlanNumberParams {
    /// Plan number to look up.
    #[serde(rename = "planNumber")]
    pub plan_number: Option<String>,
}

/// Returns all the [`Application`]s filed under the provided plan number.
///
/// # Errors
///
/// Possible error codes:
/// - `MISSING_PLAN_NUMBER` - `planNumber` is missing or blank;
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "getApplication", otel.name = api::SPAN_NAME),
)]
pub async fn get_application(
    ctx: Context,
    params: Result<Query<PlanNumberParams>, QueryRejection>,
) -> Result<Json<api::Data<Vec<Application>>>, Error> {
    let Query(PlanNumberParams { plan_number }) =
        params.map_err(AsError::into_error)?;
    let plan_number = plan_number
        .and_then(application::PlanNumber::new)
        .ok_or_else(|| Error::from(ParamsError::MissingPlanNumber))?;

    list(
        &ctx,
        read::application::list::Filter {
            plan_number: Some(plan_number),
            ..read::application::list::Filter::default()
        },
    )
    .await
}

/// Query parameters of the [`get_applications()`] endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserIdParams {
    /// ID of the user who submitted the applications.
    pub user_id: Option<String>,
}

/// Returns all the [`Application`]s submitted by the provided user.
///
/// # Errors
///
/// Possible error codes:
/// - `MISSING_USER_ID` - `user_id` is missing;
/// - `INVALID_USER_ID` - `user_id` is not a UUID;
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "getApplications", otel.name = api::SPAN_NAME),
)]
pub async fn get_applications(
    ctx: Context,
    params: Result<Query<UserIdParams>, QueryRejection>,
) -> Result<Json<api::Data<Vec<Application>>>, Error> {
    let Query(UserIdParams { user_id }) =
        params.map_err(AsError::into_error)?;
    let user_id = user_id
        .ok_or_else(|| Error::from(ParamsError::MissingUserId))?;
    let user_id = Uuid::parse_str(user_id.trim())
        .map(user::Id::from)
        .map_err(|_| Error::from(ParamsError::InvalidUserId))?;

    list(
        &ctx,
        read::application::list::Filter {
            user_id: Some(user_id),
            ..read::application::list::Filter::default()
        },
    )
    .await
}

/// Lists the [`Application`]s matching the provided
/// [`read::application::list::Filter`].
async fn list(
    ctx: &Context,
    filter: read::application::list::Filter,
) -> Result<Json<api::Data<Vec<Application>>>, Error> {
    ctx.service()
        .execute(query::applications::List::by(filter))
        .await
        .map_err(AsError::into_error)
        .map(|list| {
            Json(api::Data::from(
                list.into_iter().map(Application::from).collect::<Vec<_>>(),
            ))
        })
}

/// Query parameters of the [`get_parcel()`] endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ParcelParams {
    /// ID of the application registering the parcel.
    #[serde(rename = "parcelId")]
    pub parcel_id: Option<String>,
}

/// Returns the [`Application`] registering the provided parcel, or `null`.
///
/// # Errors
///
/// Possible error codes:
/// - `MISSING_PARCEL_ID` - `parcelId` is missing;
/// - `INVALID_PARCEL_ID` - `parcelId` is not an integer;
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "getParcel", otel.name = api::SPAN_NAME),
)]
pub async fn get_parcel(
    ctx: Context,
    params: Result<Query<ParcelParams>, QueryRejection>,
) -> Result<Json<api::Data<Option<Application>>>, Error> {
    let Query(ParcelParams { parcel_id }) =
        params.map_err(AsError::into_error)?;
    let id = parcel_id
        .ok_or_else(|| Error::from(ParamsError::MissingParcelId))?
        .trim()
        .parse::<application::Id>()
        .map_err(|_| Error::from(ParamsError::InvalidParcelId))?;

    ctx.service()
        .execute(query::application::ById::by(id))
        .await
        .map_err(AsError::into_error)
        .map(|a| Json(api::Data::from(a.map(Application::from))))
}

/// Body of the [`review_application()`] endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct Review {
    /// ID of the application to review.
    pub id: application::Id,

    /// New status of the application, in `SCREAMING_SNAKE_CASE`.
    pub status: String,
}

/// Moves an [`Application`] into a new status on behalf of the authenticated
/// reviewer.
///
/// Returns `null` if the [`Application`] doesn't exist.
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `NOT_REVIEWER` - the authenticated user cannot review applications;
/// - `INVALID_BODY` - the body is not a valid JSON review;
/// - `INVALID_STATUS` - the status is unknown or not a review outcome;
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(
        api.name = "reviewApplication",
        id = ?body.as_ref().ok().map(|Json(r)| r.id),
        otel.name = api::SPAN_NAME,
    ),
)]
pub async fn review_application(
    ctx: Context,
    body: Result<Json<Review>, JsonRejection>,
) -> Result<Json<api::Data<Option<Application>>>, Error> {
    let reviewer_id = ctx.current_session().await?.user_id;

    let Json(Review { id, status }) = body.map_err(AsError::into_error)?;
    let status = status
        .parse::<application::Status>()
        .map_err(|_| Error::from(ReviewError::InvalidStatus))?;

    ctx.service()
        .execute(command::ReviewApplication {
            application_id: id,
            status,
            reviewer_id,
        })
        .await
        .map_err(AsError::into_error)
        .map(|a| Json(api::Data::from(a.map(Application::from))))
}

impl AsError for command::review_application::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidStatus(_) => Some(ReviewError::InvalidStatus.into()),
            Self::ReviewerNotExists(_) | Self::NotReviewer(_) => {
                Some(api::PrivilegeError::Reviewer.into())
            }
        }
    }
}

define_error! {
    enum ParamsError {
        #[code = "MISSING_PLAN_NUMBER"]
        #[status = BAD_REQUEST]
        #[message = "`planNumber` is required"]
        MissingPlanNumber,

        #[code = "MISSING_USER_ID"]
        #[status = BAD_REQUEST]
        #[message = "`user_id` is required"]
        MissingUserId,

        #[code = "INVALID_USER_ID"]
        #[status = BAD_REQUEST]
        #[message = "`user_id` must be a UUID"]
        InvalidUserId,

        #[code = "MISSING_PARCEL_ID"]
        #[status = BAD_REQUEST]
        #[message = "`parcelId` is required"]
        MissingParcelId,

        #[code = "INVALID_PARCEL_ID"]
        #[status = BAD_REQUEST]
        #[message = "`parcelId` must be an integer"]
        InvalidParcelId,
    }
}

define_error! {
    enum ReviewError {
        #[code = "INVALID_STATUS"]
        #[status = BAD_REQUEST]
        #[message = "`status` must be one of `REVIEWED`, `APPROVED` or \
                     `REJECTED`"]
        InvalidStatus,
    }
}
