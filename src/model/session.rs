use serde::{Deserialize, Serialize};

/// The access/refresh token pair issued by `POST /api/token/`.
///
/// Created on login, destroyed on logout, read-only everywhere else. Every
/// API call takes a `&Session` instead of reaching for stored tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "accessToken", alias = "access", alias = "token")]
    pub access: String,
    #[serde(rename = "refreshToken", alias = "refresh", default)]
    pub refresh: String,
}

impl Session {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Session {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access)
    }
}

// Tokens stay out of logs and panic messages.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /api/token/`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: String,
}

impl From<TokenPair> for Session {
    fn from(pair: TokenPair) -> Self {
        Session::new(pair.access, pair.refresh)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys() {
        let session = Session::new("a.b.c", "r.s.t");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["accessToken"], "a.b.c");
        assert_eq!(json["refreshToken"], "r.s.t");
    }

    #[test]
    fn legacy_token_key_is_accepted() {
        let session: Session = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(session.access, "abc");
        assert_eq!(session.refresh, "");
    }

    #[test]
    fn debug_redacts_tokens() {
        let session = Session::new("secret-access", "secret-refresh");
        let printed = format!("{:?}", session);
        assert!(!printed.contains("secret"));
        assert_eq!(session.bearer(), "Bearer secret-access");
    }
}
