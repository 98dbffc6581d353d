//! Helpers shared by the HTTP API tests.

use std::time::Duration;

use axum::{body, extract::FromRequestParts as _, response::Response};
use serde_json::Value;
use service::infra::{postgres, Postgres};

use crate::{Context, Service};

/// Creates a new [`Service`] whose database is never reachable.
///
/// Nothing connects until the first query, so it suits both the requests
/// rejected before touching the database and the ones failing on it.
pub(crate) fn unreachable_service() -> Service {
    let mut conf = postgres::Config::new();
    conf.host = Some("127.0.0.1".to_owned());
    conf.port = Some(1);
    conf.user = Some("postgres".to_owned());
    conf.dbname = Some("postgres".to_owned());
    conf.connect_timeout = Some(Duration::from_secs(1));

    Service::new(
        service::Config::new("test-secret", Duration::from_secs(60)),
        Postgres::new(&conf).unwrap(),
    )
}

/// Creates a new [`Context`] of a request with the provided headers.
pub(crate) async fn context(headers: &[(http::HeaderName, &str)]) -> Context {
    let mut req = http::Request::builder().extension(unreachable_service());
    for (name, value) in headers {
        req = req.header(name, *value);
    }
    let (mut parts, ()) = req.body(()).unwrap().into_parts();

    Context::from_request_parts(&mut parts, &()).await.unwrap()
}

/// Splits the provided [`Response`] into its status and JSON body.
pub(crate) async fn json(res: Response) -> (http::StatusCode, Value) {
    let status = res.status();
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
