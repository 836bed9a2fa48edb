// ── Session and identity ──
//
// The identity (user id, role, tenant) is decoded from the access token
// at login and published on a `watch` channel. The token signature is
// not checked here; the server verifies it on every request. Expiry
// and the role are checked so a stale or foreign token never reaches
// the store.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use paydesk_api::EntityId;

use crate::error::CoreError;
use crate::model::Role;

/// Who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: EntityId,
    pub role: Role,
    /// Company the user belongs to. `None` for the superuser.
    pub tenant_id: Option<EntityId>,
}

impl Identity {
    /// Tenant filter to inject into scoped fetches: none for the
    /// superuser, the user's own company otherwise.
    pub fn scoped_tenant(&self) -> Option<&EntityId> {
        if self.role.is_superuser() {
            None
        } else {
            self.tenant_id.as_ref()
        }
    }
}

/// Access token payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    #[serde(default)]
    user_id: Option<EntityId>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    entreprise_id: Option<EntityId>,
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::InvalidToken {
        message: message.into(),
    }
}

/// Decode the identity carried by an access token.
///
/// Rejects malformed tokens, expired tokens, tokens without `userId` or
/// `role`, and roles outside the three dashboard roles.
pub fn decode_identity(token: &str) -> Result<Identity, CoreError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).map_err(
        |e| match e.kind() {
            ErrorKind::ExpiredSignature => invalid("token has expired"),
            _ => invalid(e.to_string()),
        },
    )?;
    let claims = data.claims;

    let user_id = claims.user_id.ok_or_else(|| invalid("token has no userId"))?;
    let role_name = claims
        .role
        .filter(|r| !r.is_empty())
        .ok_or_else(|| invalid("token has no role"))?;
    let role: Role = role_name
        .parse()
        .map_err(|_| invalid(format!("unsupported role: {role_name}")))?;

    let tenant_id = claims.entreprise_id.filter(|id| match id {
        EntityId::Number(n) => *n != 0,
        EntityId::Text(s) => !s.is_empty(),
    });

    Ok(Identity {
        user_id,
        role,
        tenant_id,
    })
}

/// Publishes the current identity. `None` while logged out.
pub(crate) struct Session {
    identity: watch::Sender<Option<Identity>>,
}

impl Session {
    pub(crate) fn new() -> Self {
        let (identity, _) = watch::channel(None);
        Self { identity }
    }

    pub(crate) fn current(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    /// Replace the identity. Subscribers are notified only on change.
    pub(crate) fn replace(&self, identity: Option<Identity>) -> bool {
        self.identity.send_if_modified(|current| {
            if *current == identity {
                false
            } else {
                *current = identity;
                true
            }
        })
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }
}
