use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;

use crate::domain::error::{AppError, Result};

/// User name and password taken from an `Authorization: Basic` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Parse the value of an `Authorization` header
    pub fn from_header(value: &str) -> Result<Self> {
        let encoded = value
            .strip_prefix("Basic ")
            .ok_or_else(|| AppError::SecurityError("Expected Basic authorization".to_string()))?;

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::SecurityError(format!("Malformed credentials: {}", e)))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| AppError::SecurityError("Credentials are not UTF-8".to_string()))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| AppError::SecurityError("Missing ':' in credentials".to_string()))?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Known API users, configured as two comma separated lists
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Pair `users[i]` with `passwords[i]`; extra entries on either side are ignored
    pub fn from_lists(users: &str, passwords: &str) -> Self {
        let users = users
            .split(',')
            .zip(passwords.split(','))
            .map(|(u, p)| (u.trim().to_string(), p.trim().to_string()))
            .filter(|(u, _)| !u.is_empty())
            .collect();
        Self { users }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn verify(&self, credentials: &BasicCredentials) -> bool {
        let expected = self
            .users
            .get(&credentials.username)
            .map(String::as_str)
            .unwrap_or("");
        let matches = constant_time_eq(expected, &credentials.password);
        matches && self.users.contains_key(&credentials.username)
    }
}

/// Constant-time string comparison
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
