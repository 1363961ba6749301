//! CouchDB-compatible HTTP backend.
//!
//! Connecting performs no network traffic; credentials from the DSN are sent
//! as basic auth on every request.

use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{Client, Driver, DriverError, ServerInfo};

pub const DRIVER_NAME: &str = "couch";

/// Escapes a database name into a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Clone, Debug, Default)]
pub struct CouchDriver {
    http: reqwest::Client,
}

#[async_trait]
impl Driver for CouchDriver {
    async fn connect(&self, dsn: &Url) -> Result<Arc<dyn Client>, DriverError> {
        if !matches!(dsn.scheme(), "http" | "https") {
            return Err(DriverError::InvalidDsn(format!(
                "expected an http:// or https:// url, got {}://",
                dsn.scheme()
            )));
        }

        let mut base = dsn.clone();
        if base.set_username("").is_err() || base.set_password(None).is_err() {
            return Err(DriverError::InvalidDsn(format!("{dsn} has no host")));
        }

        let credentials = (!dsn.username().is_empty()).then(|| {
            (
                dsn.username().to_owned(),
                dsn.password().map(ToOwned::to_owned),
            )
        });

        Ok(Arc::new(CouchClient {
            dsn: dsn.clone(),
            base,
            credentials,
            http: self.http.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct CouchClient {
    dsn: Url,
    base: Url,
    credentials: Option<(String, Option<String>)>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Welcome {
    version: String,
    vendor: Vendor,
}

#[derive(Debug, Deserialize)]
struct Vendor {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    reason: String,
}

/// What a request is addressed to.
#[derive(Clone, Copy, Debug)]
enum Endpoint<'a> {
    Root,
    AllDbs,
    Db(&'a str),
}

impl<'a> Endpoint<'a> {
    const fn segment(self) -> Option<&'a str> {
        match self {
            Self::Root => None,
            Self::AllDbs => Some("_all_dbs"),
            Self::Db(name) => Some(name),
        }
    }
}

impl CouchClient {
    fn url(&self, endpoint: Endpoint<'_>) -> Url {
        let mut url = self.base.clone();

        if let Some(segment) = endpoint.segment() {
            let mut path = self.base.path().trim_end_matches('/').to_owned();
            path.push('/');
            path.extend(utf8_percent_encode(segment, PATH_SEGMENT));
            url.set_path(&path);
        }

        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "couch request");

        let builder = self.http.request(method, url);

        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, password.as_deref()),
            None => builder,
        }
    }

    async fn send(&self, method: Method, endpoint: Endpoint<'_>) -> Result<Response, DriverError> {
        let url = self.url(endpoint);
        let response = self.request(method, url).send().await?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(error_for(response, endpoint).await)
    }
}

/// Maps a failed response to a [`DriverError`]. Database-specific variants
/// are only used for requests addressed to a database.
async fn error_for(response: Response, endpoint: Endpoint<'_>) -> DriverError {
    let status = response.status();

    match (status, endpoint) {
        (StatusCode::UNAUTHORIZED, _) => return DriverError::Unauthorized,
        (StatusCode::FORBIDDEN, _) => return DriverError::Forbidden,
        (StatusCode::NOT_FOUND, Endpoint::Db(db)) => return DriverError::NotFound(db.to_owned()),
        (StatusCode::PRECONDITION_FAILED, Endpoint::Db(db)) => {
            return DriverError::AlreadyExists(db.to_owned())
        }
        (StatusCode::BAD_REQUEST, Endpoint::Db(db)) => {
            return DriverError::IllegalName(db.to_owned())
        }
        _ => {}
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    let reason = if body.reason.is_empty() {
        body.error
    } else {
        body.reason
    };

    DriverError::Status {
        status: status.as_u16(),
        reason,
    }
}

/// Reduces a full server version to its release series, `2.0.0` to `2.0`.
fn release_series(version: &str) -> &str {
    match version.match_indices('.').nth(1) {
        Some((idx, _)) => version.get(..idx).unwrap_or(version),
        None => version,
    }
}

#[async_trait]
impl Client for CouchClient {
    fn dsn(&self) -> &Url {
        &self.dsn
    }

    async fn server_info(&self) -> Result<ServerInfo, DriverError> {
        let welcome: Welcome = self.send(Method::GET, Endpoint::Root).await?.json().await?;

        Ok(ServerInfo::new(
            welcome.vendor.name,
            release_series(&welcome.version),
        ))
    }

    async fn all_dbs(&self) -> Result<Vec<String>, DriverError> {
        Ok(self
            .send(Method::GET, Endpoint::AllDbs)
            .await?
            .json()
            .await?)
    }

    async fn db_exists(&self, name: &str) -> Result<bool, DriverError> {
        match self.send(Method::HEAD, Endpoint::Db(name)).await {
            Ok(_) => Ok(true),
            Err(DriverError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn create_db(&self, name: &str) -> Result<(), DriverError> {
        drop(self.send(Method::PUT, Endpoint::Db(name)).await?);
        Ok(())
    }

    async fn destroy_db(&self, name: &str) -> Result<(), DriverError> {
        drop(self.send(Method::DELETE, Endpoint::Db(name)).await?);
        Ok(())
    }
}
