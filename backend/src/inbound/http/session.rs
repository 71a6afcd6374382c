//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers deal only with the signed-in
//! [`StaffIdentity`]. The identity, provider token included, lives in the
//! private (encrypted) session cookie.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use super::error::sign_in_required;
use crate::domain::ports::SessionState;
use crate::domain::{Error, StaffIdentity};

pub(crate) const STAFF_KEY: &str = "staff";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in staff member, rotating the session key.
    pub fn persist_identity(&self, identity: &StaffIdentity) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(STAFF_KEY, identity)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in staff member, if any.
    ///
    /// A cookie that no longer decodes is treated as signed out.
    pub fn identity(&self) -> Option<StaffIdentity> {
        match self.0.get::<StaffIdentity>(STAFF_KEY) {
            Ok(identity) => identity,
            Err(error) => {
                warn!(%error, "unreadable staff identity in session cookie");
                None
            }
        }
    }

    /// Require a signed-in staff member or answer `401` with a sign-in
    /// redirect hint.
    pub fn require_identity(&self) -> Result<StaffIdentity, Error> {
        self.identity().ok_or_else(sign_in_required)
    }

    /// Drop everything stored in the session.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl SessionState for SessionContext {
    fn current_user(&self) -> Option<StaffIdentity> {
        self.identity()
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
