//! Token encryption and storage

pub mod cipher;
pub mod token_vault;

pub use cipher::TokenCipher;
pub use token_vault::TokenVault;
