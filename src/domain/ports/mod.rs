mod auth_port;
mod token_storage_port;

pub use auth_port::AuthPort;
pub use token_storage_port::TokenStoragePort;

#[cfg(test)]
pub mod mocks {
    pub use super::auth_port::MockAuthPort;
    pub use super::token_storage_port::mock::MockTokenStorage;
}
