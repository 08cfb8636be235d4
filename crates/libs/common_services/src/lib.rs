#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod database;
pub mod events;
pub mod ownership;
pub mod utils;
