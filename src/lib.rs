// src/lib.rs

//! Default-size thumbnail regeneration crawler

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
pub mod wiki;
