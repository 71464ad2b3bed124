use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Namespace key Hasura reads its session variables from.
pub const HASURA_CLAIMS_NAMESPACE: &str = "https://hasura.io/jwt/claims";
/// Role granted to every mirrored user.
pub const DEFAULT_ROLE: &str = "user";
/// Name stored when the provider identity has no display name.
pub const UNKNOWN_NAME: &str = "unknown";

/// Snapshot of the auth provider's user at event time.
///
/// Accepts the provider's own record shape (`uid`, `displayName`) as well as
/// snake_case field names. Extra provider fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    #[serde(alias = "uid")]
    pub external_id: String,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProviderIdentity {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            display_name: None,
            email: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Mirrored user row as returned by the backend.
///
/// Only `id` drives the create flow. `created_at` is informational and an
/// unparseable value decodes as `None` instead of failing the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendUser {
    pub id: String,
    pub firebase_uid: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Accepts `timestamptz` (RFC 3339) and zone-less `timestamp` columns; the
/// latter are read as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(raw)) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc()))
}

/// Values sent with the insert mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBackendUser {
    pub firebase_uid: String,
    pub name: String,
    pub email: Option<String>,
}

impl NewBackendUser {
    /// An empty display name counts as missing.
    pub fn from_identity(identity: &ProviderIdentity) -> Self {
        let name = identity
            .display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_NAME)
            .to_string();
        Self {
            firebase_uid: identity.external_id.clone(),
            name,
            email: identity.email.clone(),
        }
    }
}

/// Custom claims embedded in provider-issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "x-hasura-default-role")]
    pub default_role: String,
    #[serde(rename = "x-hasura-allowed-roles")]
    pub allowed_roles: Vec<String>,
    #[serde(rename = "x-hasura-user-id")]
    pub user_id: String,
}

impl TokenClaims {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            default_role: DEFAULT_ROLE.to_string(),
            allowed_roles: vec![DEFAULT_ROLE.to_string()],
            user_id: user_id.into(),
        }
    }

    /// The full custom-claims object. Setting it replaces every custom claim
    /// the identity carried before.
    pub fn to_custom_claims(&self) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        root.insert(
            HASURA_CLAIMS_NAMESPACE.to_string(),
            serde_json::to_value(self).unwrap_or_default(),
        );
        serde_json::Value::Object(root)
    }
}

/// Result of a successful create sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub user: BackendUser,
    pub claims: TokenClaims,
}

/// Result of a successful delete sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub user_id: String,
    pub todos_deleted: u64,
    pub users_deleted: u64,
}
