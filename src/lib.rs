// src/lib.rs

//! CampusCart client library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
