use std::collections::HashMap;
use std::fmt;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// The single operation a token is valid for.
///
/// Every consumption site checks the purpose explicitly after decoding;
/// a token issued for one purpose is rejected everywhere else even when
/// its signature and expiry are fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    Access,
    Refresh,
    VerifyEmail,
    ResetPassword,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Purpose::Access => "access",
            Purpose::Refresh => "refresh",
            Purpose::VerifyEmail => "verify-email",
            Purpose::ResetPassword => "reset-password",
        };
        f.write_str(s)
    }
}

/// Signed claim set carried by every token.
///
/// `sub`, `purpose`, `iat`, and `exp` are always present. Refresh tokens
/// additionally carry the rotation chain id (`sid`) and sequence number
/// (`seq`). Anything purpose-specific beyond that goes into `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// What this token may be used for
    pub purpose: Purpose,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Rotation chain (refresh session) identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Rotation sequence number within the chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,

    /// Additional purpose-scoped fields (flattened into the payload)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create claims issued at the current instant with the given lifetime.
    pub fn issue_now(subject: impl ToString, purpose: Purpose, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            purpose,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            sid: None,
            seq: None,
            extra: HashMap::new(),
        }
    }

    /// Bind these claims to a rotation chain position.
    pub fn with_session(mut self, session_id: impl ToString, seq: u64) -> Self {
        self.sid = Some(session_id.to_string());
        self.seq = Some(seq);
        self
    }

    /// Add a purpose-scoped custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get a custom field as a string, if present.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }
}
