//! Login payloads and the claims carried by the access token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::error;

pub const ADMIN_ROLE: &str = "ADMIN";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    /// Pre-fills the username saved by a previous "remember me" login.
    pub fn remembered(username: Option<&str>) -> Self {
        match username {
            Some(email) if !email.is_empty() => Self {
                email: email.to_string(),
                remember_me: true,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    pub fn request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

/// An authenticated session. Remembered sessions are written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub remember: bool,
}

impl Session {
    pub fn claims(&self) -> Option<TokenClaims> {
        TokenClaims::decode(&self.access_token)
    }

    pub fn is_admin(&self) -> bool {
        self.claims().is_some_and(|claims| claims.is_admin())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TokenClaims {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl TokenClaims {
    /// Reads the payload segment of a JWT. The signature is not checked; the backend does that.
    pub fn decode(token: &str) -> Option<TokenClaims> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) => payload,
            _ => {
                error!("[ERROR Decoding Token] expected three segments");
                return None;
            }
        };

        let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!("[ERROR Decoding Token] {err}");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(claims) => Some(claims),
            Err(err) => {
                error!("[ERROR Decoding Token] {err}");
                None
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| role == ADMIN_ROLE)
    }
}

#[cfg(test)]
pub(crate) fn token_with_roles(roles: &[&str]) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::json!({
        "id": "u-1",
        "email": "agent@navlion.mr",
        "roles": roles,
    });
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_is_detected() {
        let claims = TokenClaims::decode(&token_with_roles(&["USER", "ADMIN"])).unwrap();
        assert_eq!(claims.email, "agent@navlion.mr");
        assert!(claims.is_admin());

        let session = Session {
            access_token: token_with_roles(&["USER"]),
            remember: false,
        };
        assert!(!session.is_admin());
    }

    #[test]
    fn malformed_tokens_are_not_admin() {
        for token in ["", "abc", "a.%%%.c", "a.bm90IGpzb24.c"] {
            let session = Session {
                access_token: token.to_string(),
                remember: true,
            };
            assert!(!session.is_admin(), "{token}");
        }
    }

    #[test]
    fn remembered_username_checks_remember_me() {
        let form = LoginForm::remembered(Some("agent@navlion.mr"));
        assert_eq!(form.email, "agent@navlion.mr");
        assert!(form.remember_me);
        assert_eq!(LoginForm::remembered(Some("")), LoginForm::default());
        assert_eq!(LoginForm::remembered(None), LoginForm::default());
    }

    #[test]
    fn login_request_omits_remember_flag() {
        let form = LoginForm {
            email: "a@b.mr".into(),
            password: "pw".into(),
            remember_me: true,
        };
        let body = serde_json::to_value(form.request()).unwrap();
        assert_eq!(body, serde_json::json!({ "email": "a@b.mr", "password": "pw" }));
    }
}
