pub mod jwt;
pub mod password;
pub mod token_revocation;

pub use jwt::{Claims, TokenCodec};
pub use password::{hash_password, verify_password};
pub use token_revocation::{RedisRevocationStore, RevocationStore};
