//! Terminal front end: a pure state machine ([`app`]) and its rendering ([`view`]).

pub mod app;
pub mod view;
