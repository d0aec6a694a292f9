//! Client-side login state.

use serde::{Deserialize, Serialize};

use crate::models::user::{
    Owner, UserResponse, UserRole, DEMO_ADMIN_EMAIL, DEMO_ADMIN_ID, DEMO_ADMIN_NAME,
    DEMO_ADMIN_PASSWORD,
};
use crate::services::auth::AuthResponse;

/// The signed-in user, if any, and the bearer token for API calls.
///
/// A demo session has a user but no token; it drives the mock source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<UserResponse>,
    pub token: Option<String>,
}

impl Session {
    /// Local administrator session for the demo credential, built without a
    /// network call. `None` for any other credential.
    pub fn demo(email: &str, password: &str) -> Option<Self> {
        if !email.trim().eq_ignore_ascii_case(DEMO_ADMIN_EMAIL) || password != DEMO_ADMIN_PASSWORD
        {
            return None;
        }
        Some(Self {
            user: Some(UserResponse {
                id: DEMO_ADMIN_ID,
                name: DEMO_ADMIN_NAME.to_string(),
                email: DEMO_ADMIN_EMAIL.to_string(),
                role: UserRole::Admin,
            }),
            token: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_demo(&self) -> bool {
        self.user.is_some() && self.token.is_none()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == UserRole::Admin)
    }

    /// Owner reference for per-owner operations.
    pub fn owner(&self) -> Option<Owner> {
        self.user.as_ref().map(UserResponse::owner)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            user: Some(auth.user),
            token: Some(auth.access_token),
        }
    }
}
