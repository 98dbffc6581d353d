//! In-memory [`Database`] backing [`Service`] tests.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use common::{
    operations::{By, Commit, Lock, Select, Transact, Update},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{application, payment::Ledger, user, Application, User},
    infra::{
        database::{self, postgres},
        Database,
    },
    read, Config, Service,
};

/// In-memory data store.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory {
    /// Stored [`Application`]s, shared between transactions.
    pub(crate) applications: Arc<Mutex<Vec<Application>>>,

    /// Stored [`User`]s.
    pub(crate) users: Vec<User>,

    /// Stored payments, as pairs of a [`Ledger`] table and a paid
    /// [`Application`] ID.
    pub(crate) payments: Vec<(&'static str, application::Id)>,

    /// Whether every operation fails.
    pub(crate) broken: bool,

    /// Whether a transaction was committed.
    pub(crate) committed: Arc<Mutex<bool>>,
}

impl Memory {
    /// Creates a new [`Memory`] holding the provided [`Application`]s.
    pub(crate) fn with_applications(
        applications: impl IntoIterator<Item = Application>,
    ) -> Self {
        Self {
            applications: Arc::new(Mutex::new(
                applications.into_iter().collect(),
            )),
            ..Self::default()
        }
    }

    /// Makes every operation of this [`Memory`] fail.
    pub(crate) fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// Returns a copy of the stored [`Application`]s.
    pub(crate) fn applications(&self) -> Vec<Application> {
        self.applications.lock().unwrap().clone()
    }

    /// Fails if this [`Memory`] is [`Memory::broken`].
    fn check(&self) -> Result<(), Traced<database::Error>> {
        if self.broken {
            let e = postgres::Error::from(
                postgres::connection::PoolError::Closed,
            );
            return Err(tracerr::new!(database::Error::from(e)));
        }
        Ok(())
    }
}

impl Database<Select<By<Vec<Application>, read::application::list::Filter>>>
    for Memory
{
    type Ok = Vec<Application>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Application>, read::application::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        let filter = by.into_inner();
        let mut found = self
            .applications()
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect::<Vec<_>>();
        found.sort_by_key(|a| a.id);
        Ok(found)
    }
}

impl Database<Select<By<Option<Application>, application::Id>>> for Memory {
    type Ok = Option<Application>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Application>, application::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        let id = by.into_inner();
        Ok(self.applications().into_iter().find(|a| a.id == id))
    }
}

impl Database<Lock<By<Application, application::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Application, application::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()
    }
}

impl Database<Update<Application>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(application): Update<Application>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        let mut stored = self.applications.lock().unwrap();
        if let Some(a) = stored.iter_mut().find(|a| a.id == application.id) {
            *a = application;
        }
        Ok(())
    }
}

impl Database<Select<By<Vec<read::payment::Row>, Ledger>>> for Memory {
    type Ok = Vec<read::payment::Row>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::payment::Row>, Ledger>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        let Ledger { table, .. } = by.into_inner();

        let applications = self.applications.lock().unwrap();
        let mut rows = self
            .payments
            .iter()
            .filter(|(t, _)| *t == table)
            .filter_map(|(_, id)| applications.iter().find(|a| a.id == *id))
            .map(|a| read::payment::Row {
                application_id: a.id,
                paid_amount: a.paid_amount,
                pillar_payment_fee: a.pillar_payment_fee,
                pillar_count: a.pillar_count,
                misc_fee: a.misc_fee,
            })
            .collect::<Vec<_>>();
        rows.sort_by_key(|r| r.application_id);
        Ok(rows)
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        let id = by.into_inner();
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Login>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Login>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        let login = by.into_inner();
        Ok(self.users.iter().find(|u| u.login.matches(login)).cloned())
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.check()?;
        *self.committed.lock().unwrap() = true;
        Ok(())
    }
}

/// Creates a new [`Service`] over the provided [`Memory`].
pub(crate) fn service(memory: Memory) -> Service<Memory> {
    Service::new(
        Config::new("test-secret", Duration::from_secs(30 * 60)),
        memory,
    )
}

/// Creates a new submitted [`Application`] with the provided ID.
pub(crate) fn application(id: i64) -> Application {
    Application {
        id: id.into(),
        user_id: None,
        geometry: Some(
            application::Geometry::from_json(
                r#"{"type":"Point","coordinates":[4.5418,8.4966]}"#,
            )
            .unwrap(),
        ),
        pillar_type: Some("Concrete".into()),
        client_name: Some("Adebayo Musa".into()),
        address: Some("12 Unity Road, Ilorin".into()),
        lga: Some("Ilorin West".into()),
        plan_number: application::PlanNumber::new(format!("KW/{id}")),
        area: None,
        surveyor_name: Some("Surv. Ibrahim Bello".into()),
        status: application::Status::Submitted,
        payment_status: application::PaymentStatus::Pending,
        paid_amount: None,
        pillar_payment_fee: None,
        pillar_count: None,
        misc_fee: None,
        created_at: DateTime::now().coerce(),
        review: None,
    }
}

/// Creates a new [`User`] with the provided credentials and [`user::Role`].
pub(crate) fn user(login: &str, password: &str, role: user::Role) -> User {
    User {
        id: user::Id::new(),
        name: user::Name::new(login).unwrap(),
        login: user::Login::new(login).unwrap(),
        password_hash: user::PasswordHash::new(&password.into()),
        role,
        created_at: DateTime::now().coerce(),
    }
}
