/// In-memory storage with fail injection, used by the test suites
#[cfg(test)]
pub mod memory;
pub mod postgres;
