//! Credential hashing for newly created users.

mod password;

pub use password::Argon2PasswordService;
