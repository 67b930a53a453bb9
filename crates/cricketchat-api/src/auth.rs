use cricketchat_store::AuthStore;
use cricketchat_types::{AuthState, Credentials};

use crate::{ApiClient, ApiError};

/// Shown when a login is rejected without a server message
pub const LOGIN_FAILED: &str = "Login failed";

/// Shown when a signup is rejected without a server message
pub const SIGNUP_FAILED: &str = "Signup failed";

/// Login, signup and logout. A successful login or signup replaces the
/// stored auth session; a failure leaves it untouched.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn store(&self) -> &AuthStore {
        self.client.auth_store()
    }

    /// The stored session, if any
    pub fn current(&self) -> Option<AuthState> {
        self.store().get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store().bearer_token().is_some()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthState, ApiError> {
        let auth = self.client.login(&Credentials::login(email, password)).await?;
        self.store().set(&auth)?;
        log::info!("Logged in as {}", auth.user.email);
        Ok(auth)
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<AuthState, ApiError> {
        let auth = self
            .client
            .signup(&Credentials::signup(email, password, name))
            .await?;
        self.store().set(&auth)?;
        log::info!("Signed up as {}", auth.user.email);
        Ok(auth)
    }

    /// Forget the stored session. Safe to call when logged out.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store().clear()?;
        Ok(())
    }
}
