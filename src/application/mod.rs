//! Application layer (use-cases, policies).
//!
//! This module orchestrates domain logic and defines app-specific
//! policies without depending on UI frameworks or platform surfaces.

pub mod editor;
pub mod export;
pub mod session;
pub mod share;
pub mod status;
