mod storage;
mod user_repository;

pub use storage::{FailPoint, InMemoryStorage, InMemoryTransaction, StorageState};
pub use user_repository::InMemoryUserRepository;
