//! Authentication request/response payloads.

use serde::{Deserialize, Serialize};

use crate::session::TokenPair;

/// Authenticated user as returned by `/auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// `POST /auth/refresh-token` body.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `{ "tokens": TokenPair }` wrapper used by login and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokensEnvelope {
    pub tokens: TokenPair,
}

/// Registration result. The server may answer with an empty body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_uses_camel_case() {
        let body = serde_json::to_value(RegisterRequest {
            email: "a@b.c".into(),
            password: "secret1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: None,
        })
        .expect("serialize");
        assert_eq!(body["firstName"], "Ada");
        assert_eq!(body["lastName"], "Lovelace");
        assert!(body.get("phone").is_none());
    }

    #[test]
    fn tokens_envelope_ignores_extra_fields() {
        let env: TokensEnvelope = serde_json::from_str(
            r#"{"message":"login successful","tokens":{"access_token":"A","refresh_token":"R","expires_in":900,"token_type":"Bearer"}}"#,
        )
        .expect("parse");
        assert_eq!(env.tokens.access_token, "A");
        assert_eq!(env.tokens.expires_in, 900);
    }

    #[test]
    fn register_response_tolerates_server_user_shape() {
        let resp: RegisterResponse = serde_json::from_str(
            r#"{"message":"user registered successfully","user":{"id":"u1","email":"a@b.c","isVerified":false,"role":"user"}}"#,
        )
        .expect("parse");
        let user = resp.user.expect("user");
        assert_eq!(user.id, "u1");
        assert_eq!(user.role.as_deref(), Some("user"));
        assert!(user.first_name.is_none());
    }
}
