//! [`Command`] for authorizing a [`Session`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`Session`] by its [`session::Token`].
///
/// The [`Session`] is valid only while it's not expired and its [`User`]
/// still exists.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        drop(
            self.database()
                .execute(Select(By::new(session.user_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::UserNotExists(session.user_id))
                .map_err(tracerr::wrap!())?,
        );

        Ok(session)
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error, including an expired [`Session`].
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::user::{self, session, Session},
        test_support::{service, Memory},
        Command as _,
    };

    use super::{AuthorizeUserSession, ExecutionError};

    fn token(
        service: &crate::Service<Memory>,
        session: &Session,
    ) -> session::Token {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            session,
            &service.config().jwt_encoding_key,
        )
        .unwrap();
        #[expect(unsafe_code, reason = "test token")]
        unsafe {
            session::Token::new_unchecked(token)
        }
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let service = service(Memory::default());
        let token = "not.a.token".parse::<session::Token>().unwrap();

        let err = service
            .execute(AuthorizeUserSession { token })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_expired_session() {
        let service = service(Memory::default());
        let expired = Session {
            user_id: user::Id::new(),
            expires_at: DateTime::from_unix_timestamp(
                DateTime::now().unix_timestamp() - 3600,
            )
            .unwrap()
            .coerce(),
        };

        let err = service
            .execute(AuthorizeUserSession {
                token: token(&service, &expired),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_session_of_removed_user() {
        let service = service(Memory::default());
        let session = Session {
            user_id: user::Id::new(),
            expires_at: (DateTime::now()
                + std::time::Duration::from_secs(60))
            .coerce(),
        };

        let err = service
            .execute(AuthorizeUserSession {
                token: token(&service, &session),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::UserNotExists(id) if *id == session.user_id,
        ));
    }
}
