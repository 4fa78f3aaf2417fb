//! Local JSON API

pub mod errors;
pub mod handlers;
pub mod serve;
