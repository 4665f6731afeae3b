//! API Routes
//!
//! Route handlers organized by functionality.

pub mod diaries;
pub mod health;
pub mod profile;
pub mod weather;
