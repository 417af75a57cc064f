pub mod error;
pub mod remote;
pub mod repository;
pub mod todo;
