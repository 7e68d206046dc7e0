mod product_repository;
mod pvz_repository;
mod reception_repository;
mod transaction;
mod user_repository;

pub use transaction::{PostgresTransaction, PostgresTransactionManager};
pub use user_repository::PostgresUserRepository;
