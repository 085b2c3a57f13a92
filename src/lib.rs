// src/lib.rs

//! novelbot: answers `[[Title]]` mentions on Reddit with Novel Updates summaries.

pub mod error;
pub mod forum;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
