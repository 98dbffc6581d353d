//! [`User`]-related endpoint definitions.

use axum::{extract::rejection::JsonRejection, Json};
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{
        self,
        user::{self, session},
    },
    query,
};

use crate::{api, define_error, AsError, Context, Error};

/// Portal user as rendered by the API.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    /// ID of this [`User`].
    pub id: user::Id,

    /// Name of this [`User`].
    pub name: String,

    /// Login of this [`User`].
    pub login: String,

    /// Role of this [`User`], in `SCREAMING_SNAKE_CASE`.
    pub role: String,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            id: user.id,
            name: user.name.to_string(),
            login: user.login.to_string(),
            role: user.role.to_string(),
        }
    }
}

/// Body of the [`login()`] endpoint.
#[derive(Deserialize)]
pub struct Credentials {
    /// Login of a [`User`].
    pub login: String,

    /// Password of a [`User`].
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

/// Issued session of a [`User`].
#[derive(Clone, Debug, Serialize)]
pub struct Session {
    /// Bearer token to authorize further requests with.
    pub token: String,

    /// When the `token` expires.
    #[serde(serialize_with = "common::datetime::serde::rfc3339::serialize")]
    pub expires_at: session::ExpirationDateTime,

    /// Authenticated [`User`].
    pub user: User,
}

/// Creates a new session by [`User`] credentials.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_BODY` - the body is not valid JSON credentials;
/// - `WRONG_CREDENTIALS` - no [`User`] has the provided credentials;
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(
        api.name = "login",
        login = ?body.as_ref().ok().map(|Json(c)| c.login.as_str()),
        otel.name = api::SPAN_NAME,
    ),
)]
pub async fn login(
    ctx: Context,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Session>, Error> {
    let Json(Credentials { login, password }) =
        body.map_err(AsError::into_error)?;

    let login = user::Login::new(login)
        .ok_or_else(|| Error::from(SessionError::WrongCredentials))?;
    let password = user::Password::new(password)
        .ok_or_else(|| Error::from(SessionError::WrongCredentials))?;

    ctx.service()
        .execute(command::CreateUserSession {
            login,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(AsError::into_error)
        .map(|out| {
            Json(Session {
                token: out.token.to_string(),
                expires_at: out.expires_at,
                user: out.user.into(),
            })
        })
}

/// Returns the authenticated [`User`].
///
/// # Errors
///
/// Possible error codes:
/// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
/// - `INTERNAL_SERVER_ERROR` - the database failed.
#[tracing::instrument(
    skip_all,
    fields(api.name = "me", otel.name = api::SPAN_NAME),
)]
pub async fn me(ctx: Context) -> Result<Json<api::Data<User>>, Error> {
    let my_id = ctx.current_session().await?.user_id;

    ctx.service()
        .execute(query::user::ById::by(my_id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| crate::context::AuthError::AuthorizationRequired.into())
        .map(|u| Json(User::from(u).into()))
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::WrongCredentials => {
                Some(SessionError::WrongCredentials.into())
            }
        }
    }
}

define_error! {
    enum SessionError {
        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Provided credentials do not match any `User`"]
        WrongCredentials,
    }
}

#[cfg(test)]
mod spec {
    use axum::{response::IntoResponse as _, Json};

    use crate::test_support::{context, json};

    use super::{login, me, Credentials};

    #[tokio::test]
    async fn malformed_login_is_wrong_credentials() {
        let res = login(
            context(&[]).await,
            Ok(Json(Credentials {
                login: "two words".to_owned(),
                password: "s3cret".to_owned(),
            })),
        )
        .await
        .into_response();

        let (status, body) = json(res).await;
        assert_eq!(status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "WRONG_CREDENTIALS");
    }

    #[tokio::test]
    async fn me_requires_authorization() {
        let res = me(context(&[]).await).await.into_response();

        let (status, body) = json(res).await;
        assert_eq!(status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTHORIZATION_REQUIRED");
    }
}
