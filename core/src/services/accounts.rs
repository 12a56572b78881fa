use crate::credentials::{hash_password, verify_password};
use crate::error::{BookingError, Result};
use crate::store::UserStore;
use crate::types::{NewUser, Principal, Role, User, UserId};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Registration, login and profile lookup.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
}

impl AccountService {
    /// Create an account service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a new account.
    ///
    /// The email is stored lower-cased.
    ///
    /// # Errors
    ///
    /// [`BookingError::Validation`] for malformed input,
    /// [`BookingError::Conflict`] if the email is taken.
    pub async fn register(&self, mut request: NewUser) -> Result<User> {
        request.name = request.name.trim().to_string();
        request.email = request.email.trim().to_lowercase();
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(BookingError::Conflict(format!(
                "Email {} is already registered",
                request.email
            )));
        }

        let user = User {
            id: UserId::new(),
            name: request.name,
            email: request.email,
            tel: request.tel,
            role: request.role,
            password_hash: hash_password(&request.password)?,
            created_at: Utc::now(),
        };
        let user = self.users.insert(user).await?;
        if user.role == Role::Admin {
            warn!(user_id = %user.id, email = %user.email, "Admin account self-registered");
        } else {
            info!(user_id = %user.id, role = %user.role, "User registered");
        }
        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// # Errors
    ///
    /// [`BookingError::InvalidCredentials`] for an unknown email or a wrong
    /// password alike.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("Login for unknown email");
            return Err(BookingError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(BookingError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// The account behind a principal.
    ///
    /// # Errors
    ///
    /// [`BookingError::UserNotFound`] if the account no longer exists.
    pub async fn me(&self, principal: &Principal) -> Result<User> {
        self.users
            .find_by_id(principal.id)
            .await?
            .ok_or(BookingError::UserNotFound(principal.id))
    }
}
