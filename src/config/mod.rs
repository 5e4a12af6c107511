// src/config/mod.rs
pub mod client;
pub mod theme;

pub use client::ClientConfig;
pub use theme::{Theme, ThemeStore};
