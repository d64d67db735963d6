//! Credentials and their structural validation.

use validator::ValidateEmail;

use super::Role;
use crate::config::{PasswordPolicy, MAX_NAME_LENGTH};
use crate::errors::{AppError, AppResult};

/// Transient email + password pair.
///
/// `role` is only ever filled in by the server: signup forces `user` and
/// the admin-creation path forces `admin`. No request type deserializes it.
#[derive(Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Email in its stored form.
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

/// Everything a new account needs besides its server-assigned role.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub credentials: Credentials,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Registration {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }

    /// Fix the role the account will be created with.
    pub fn with_role(mut self, role: Role) -> Self {
        self.credentials = self.credentials.with_role(role);
        self
    }

    pub fn with_names(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }
}

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks credentials against the email shape and the password policy.
#[derive(Debug, Clone, Default)]
pub struct CredentialValidator {
    policy: PasswordPolicy,
}

impl CredentialValidator {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    /// Validate credentials, reporting every violated rule at once.
    ///
    /// # Errors
    /// `AppError::Validation` carrying one message per failed rule.
    pub fn validate(&self, credentials: &Credentials) -> AppResult<()> {
        into_result(self.credential_violations(credentials))
    }

    /// Validate a whole registration: credentials plus the optional names.
    ///
    /// # Errors
    /// `AppError::Validation` listing every failed rule across all fields.
    pub fn validate_registration(&self, registration: &Registration) -> AppResult<()> {
        let mut violations = self.credential_violations(&registration.credentials);

        let names = [
            ("First name", &registration.first_name),
            ("Last name", &registration.last_name),
        ];
        for (label, name) in names {
            let too_long = name
                .as_deref()
                .is_some_and(|n| n.trim().chars().count() > MAX_NAME_LENGTH);
            if too_long {
                violations.push(format!(
                    "{} must be at most {} characters",
                    label, MAX_NAME_LENGTH
                ));
            }
        }

        into_result(violations)
    }

    fn credential_violations(&self, credentials: &Credentials) -> Vec<String> {
        let mut violations = Vec::new();

        let email = credentials.normalized_email();
        if email.is_empty() {
            violations.push("Email is required".to_string());
        } else if !email.validate_email() {
            violations.push("Invalid email format".to_string());
        }

        violations.extend(self.password_violations(&credentials.password));
        violations
    }

    fn password_violations(&self, password: &str) -> Vec<String> {
        let policy = &self.policy;
        let mut violations = Vec::new();

        if password.chars().count() < policy.min_length {
            violations.push(format!(
                "Password must be at least {} characters",
                policy.min_length
            ));
        }
        if policy.require_uppercase && !password.chars().any(char::is_uppercase) {
            violations.push("Password must contain an uppercase letter".to_string());
        }
        if policy.require_lowercase && !password.chars().any(char::is_lowercase) {
            violations.push("Password must contain a lowercase letter".to_string());
        }
        if policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push("Password must contain a digit".to_string());
        }
        if policy.require_symbol && !password.chars().any(|c| !c.is_alphanumeric()) {
            violations.push("Password must contain a symbol".to_string());
        }

        violations
    }
}

fn into_result(violations: Vec<String>) -> AppResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}
