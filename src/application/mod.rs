pub mod cache;
pub mod todo_api;
mod todo_api_tests;
pub mod todo_service;
