//! Infrastructure layer (adapters/implementations).
//!
//! This module contains IO-heavy integrations (Gemini, clipboard, share
//! surfaces, filesystem, rasterization).

pub mod app_config;
pub mod clipboard;
pub mod fallback;
pub mod gemini;
pub mod generation;
pub mod image_source;
pub mod render;
pub mod share;
