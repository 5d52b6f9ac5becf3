pub mod credentials;

pub use credentials::{BasicCredentials, CredentialStore};
