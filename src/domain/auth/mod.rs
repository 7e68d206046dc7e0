pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{Principal, User};
pub use errors::{AuthError, HashError, ValidationError};
pub use ports::{PasswordHasher, TokenIssuer, UserRepository};
pub use services::{AuthService, Authorization};
pub use value_objects::{Email, Password, PasswordHash, UserRole};
