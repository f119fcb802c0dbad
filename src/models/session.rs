use serde::{Deserialize, Serialize};

/// Signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// Bearer session kept across page loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

/// Sign-in / sign-up request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SessionToken {
    access_token: String,
}

/// Body of `POST /api/auth/login` and `POST /api/auth/signup`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    user: User,
    session: SessionToken,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session {
            access_token: self.session.access_token,
            user: self.user,
        }
    }
}
