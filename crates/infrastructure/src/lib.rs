//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_identity_backend;
mod in_memory_rate_limit_repository;
mod rate_limit_sweeper;
mod system_clock;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_identity_backend::InMemoryIdentityBackend;
pub use in_memory_rate_limit_repository::InMemoryRateLimitRepository;
pub use rate_limit_sweeper::RateLimitSweeper;
pub use system_clock::SystemClock;
