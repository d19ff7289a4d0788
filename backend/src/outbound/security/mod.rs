//! Security adapters such as the Argon2 password hasher.

mod argon2_hasher;

pub use argon2_hasher::{Argon2PasswordHasher, HashingParams};
