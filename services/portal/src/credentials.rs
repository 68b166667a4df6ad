//! services/portal/src/credentials.rs
//!
//! Account creation and password verification on top of the `CredentialStore`
//! port. Passwords are hashed with Argon2 and a fresh random salt; only the PHC
//! string ever reaches the store.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use gyanganga_core::domain::{NewUser, User};
use gyanganga_core::ports::{CredentialStore, PortError};
use regex::Regex;
use std::sync::{Arc, OnceLock};

pub const DEFAULT_ROLE: &str = "student";

/// What a visitor submits on the signup form.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("Invalid signup: {0}")]
    Invalid(&'static str),
    #[error("Username or email already registered")]
    Conflict,
    #[error("Failed to hash password: {0}")]
    Hash(String),
    #[error("Store error: {0}")]
    Store(PortError),
}

/// Why a login attempt was rejected. Callers show the same message for every
/// variant; the distinction is only for logs.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("No user with that username")]
    UnknownUser,
    #[error("Password does not match")]
    PasswordMismatch,
    #[error("Store error: {0}")]
    Store(PortError),
}

#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn CredentialStore>,
}

impl Credentials {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Validates the account, hashes the password and inserts the user.
    pub async fn create_user(&self, account: NewAccount) -> Result<User, SignupError> {
        let account = normalize(account)?;
        let password_hash =
            hash_password(&account.password).map_err(|e| SignupError::Hash(e.to_string()))?;

        let new_user = NewUser {
            full_name: account.full_name,
            username: account.username,
            email: account.email,
            password_hash,
            role: account.role,
        };

        self.store.create_user(&new_user).await.map_err(|e| match e {
            PortError::Conflict(_) => SignupError::Conflict,
            other => SignupError::Store(other),
        })
    }

    /// Looks the user up by username and checks the password against the stored hash.
    pub async fn verify(&self, username: &str, password: &str) -> Result<User, LoginError> {
        let credentials = self
            .store
            .get_credentials_by_username(username.trim())
            .await
            .map_err(LoginError::Store)?
            .ok_or(LoginError::UnknownUser)?;

        if verify_password(password, &credentials.password_hash) {
            Ok(credentials.user)
        } else {
            Err(LoginError::PasswordMismatch)
        }
    }
}

/// Produces an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("Failed to parse stored password hash: {:?}", e);
            false
        }
    }
}

/// Accepts anything shaped like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
        })
        .is_match(email)
}

fn normalize(account: NewAccount) -> Result<NewAccount, SignupError> {
    let full_name = account.full_name.trim().to_string();
    let username = account.username.trim().to_string();
    let email = account.email.trim().to_string();
    let role = match account.role.trim() {
        "" => DEFAULT_ROLE.to_string(),
        role => role.to_string(),
    };

    if full_name.is_empty() {
        return Err(SignupError::Invalid("full name is required"));
    }
    if username.is_empty() {
        return Err(SignupError::Invalid("username is required"));
    }
    if !is_valid_email(&email) {
        return Err(SignupError::Invalid("a valid email is required"));
    }
    if account.password.trim().is_empty() {
        return Err(SignupError::Invalid("password is required"));
    }

    Ok(NewAccount {
        full_name,
        username,
        email,
        password: account.password,
        role,
    })
}
