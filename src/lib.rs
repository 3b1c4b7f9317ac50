//! Backend for "Os Farofeiros" — a tiny app where friends suggest dishes
//! for the Christmas and New Year's Eve parties and vote on what gets
//! cooked. JSON API plus a WebSocket change feed; PostgreSQL behind a
//! swappable store trait.

pub mod auth;
pub mod broadcast;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
pub mod tally;
pub mod voting;
