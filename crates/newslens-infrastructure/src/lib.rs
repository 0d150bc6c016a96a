//! newslens-infrastructure: local persistence for the newslens client.

pub mod paths;
pub mod token_storage;

pub use paths::NewslensPaths;
pub use token_storage::FileTokenStorage;
