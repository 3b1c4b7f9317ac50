pub mod dish;
pub mod event;
pub mod user;
pub mod vote;
