use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Role reported for a signed-in user whose record carries none.
pub const DEFAULT_ROLE: &str = "user";

/// Opaque identity record returned by the API alongside the bearer token.
///
/// The client only interprets `role`; every other field is carried verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserRecord(pub Map<String, Value>);

impl UserRecord {
    /// Build a record holding only a role.
    #[must_use]
    pub fn with_role(role: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("role".to_string(), Value::String(role.into()));
        Self(fields)
    }

    /// The role stored on the record, if it is a string.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }

    /// The email stored on the record, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    /// Look up an arbitrary field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overwrite the fields present in `patch`, keeping all others.
    pub fn merge(&mut self, patch: Self) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    /// Whether the record has no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for UserRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `null` is treated like a missing record.
        Option::<Map<String, Value>>::deserialize(deserializer)
            .map(|fields| Self(fields.unwrap_or_default()))
    }
}

/// The authenticated-user payload held client-side.
///
/// Fields beyond `access_token` and `user` (for example `refresh_token` or
/// `token_type`) are kept in `extra` so that a persisted session reads back
/// exactly as it was installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token sent on authenticated requests.
    pub access_token: String,
    /// Identity record of the signed-in user.
    #[serde(default)]
    pub user: UserRecord,
    /// Any other top-level fields of the login payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// Create a session from a token and a user record.
    pub fn new(access_token: impl Into<String>, user: UserRecord) -> Self {
        Self {
            access_token: access_token.into(),
            user,
            extra: Map::new(),
        }
    }

    /// Role of the signed-in user, defaulting to [`DEFAULT_ROLE`].
    #[must_use]
    pub fn role(&self) -> &str {
        self.user.role().unwrap_or(DEFAULT_ROLE)
    }

    /// Whether the token can be sent as a credential.
    ///
    /// Empty, whitespace-only and literal `"null"` tokens are rejected; the
    /// last one shows up when a missing token was stringified upstream.
    #[must_use]
    pub fn has_usable_token(&self) -> bool {
        let token = self.access_token.trim();
        !token.is_empty() && token != "null"
    }
}

/// Email/password pair posted to `/auth/login` and `/auth/register`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Build a credential pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
