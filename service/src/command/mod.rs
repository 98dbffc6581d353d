//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_user_session;
pub mod review_application;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_user_session::CreateUserSession,
    review_application::ReviewApplication,
};
