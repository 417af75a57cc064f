pub mod rest_remote;
pub mod sqlite_repo;
