//! Wire models shared by the velo-studio HTTP clients.

pub mod models;
