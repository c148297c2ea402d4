pub mod repo;
pub mod sync;
pub mod types;
