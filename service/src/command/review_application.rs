//! [`Command`] for reviewing an [`Application`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{application, user, Application, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving an [`Application`] into a new
/// [`application::Status`] on behalf of a reviewing [`User`].
#[derive(Clone, Copy, Debug)]
pub struct ReviewApplication {
    /// ID of the [`Application`] to review.
    pub application_id: application::Id,

    /// New [`application::Status`] of the [`Application`].
    pub status: application::Status,

    /// ID of the [`User`] reviewing the [`Application`].
    pub reviewer_id: user::Id,
}

impl<Db> Command<ReviewApplication> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Application>, application::Id>>,
            Ok = Option<Application>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Application, application::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Application>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    /// Reviewed [`Application`], if it exists.
    type Ok = Option<Application>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReviewApplication,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReviewApplication {
            application_id,
            status,
            reviewer_id,
        } = cmd;

        if !status.is_review_outcome() {
            return Err(tracerr::new!(E::InvalidStatus(status)));
        }

        let reviewer = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(reviewer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReviewerNotExists(reviewer_id))
            .map_err(tracerr::wrap!())?;
        if !reviewer.role.can_review() {
            return Err(tracerr::new!(E::NotReviewer(reviewer_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent reviews of the same `Application`.
        tx.execute(Lock(By::new(application_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let Some(mut application) = tx
            .execute(Select(By::<Option<Application>, _>::new(
                application_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            return Ok(None);
        };

        application.review(status, reviewer_id);
        tx.execute(Update(application.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Application(id: {application_id})` moved into `{status}` by \
             `User(id: {reviewer_id})`",
        );
        Ok(Some(application))
    }
}

/// Error of [`ReviewApplication`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`application::Status`] cannot be a review outcome.
    #[display("`{_0}` is not a review outcome")]
    #[from(ignore)]
    InvalidStatus(#[error(not(source))] application::Status),

    /// [`User`] reviewing the [`Application`] does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    ReviewerNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not allowed to review [`Application`]s.
    #[display("`User(id: {_0})` is not allowed to review `Application`s")]
    #[from(ignore)]
    NotReviewer(#[error(not(source))] user::Id),
}
