pub mod entities;
pub mod errors;
pub mod operations;
pub mod ports;
pub mod services;
pub mod transaction;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use operations::*;
pub use ports::*;
pub use services::*;
pub use transaction::TransactionCoordinator;
pub use value_objects::*;
