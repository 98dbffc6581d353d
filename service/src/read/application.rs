//! [`Application`]-related read definitions.
//!
//! [`Application`]: crate::domain::Application

pub mod list {
    //! [`Application`]s list definitions.

    #[cfg(doc)]
    use crate::domain::User;
    use crate::domain::{application, user, Application};

    /// Filter of an [`Application`]s list.
    ///
    /// Unset criteria don't restrict the list, so the default [`Filter`]
    /// lists all the [`Application`]s.
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// [`application::Id`] to match.
        pub id: Option<application::Id>,

        /// [`application::PlanNumber`] to match.
        pub plan_number: Option<application::PlanNumber>,

        /// ID of the [`User`] who submitted the [`Application`]s.
        pub user_id: Option<user::Id>,
    }

    impl Filter {
        /// Checks whether the provided [`Application`] matches this
        /// [`Filter`].
        #[must_use]
        pub fn matches(&self, application: &Application) -> bool {
            let Self {
                id,
                plan_number,
                user_id,
            } = self;

            id.map_or(true, |id| application.id == id)
                && plan_number.as_ref().map_or(true, |n| {
                    application.plan_number.as_ref() == Some(n)
                })
                && user_id.map_or(true, |id| application.user_id == Some(id))
        }
    }
}
