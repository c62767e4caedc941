/// State management module
///
/// This module handles all application state, including:
/// - Product data structures (data.rs)
/// - The fixed seed catalog (catalog.rs)
/// - Asynchronous catalog access with simulated latency (service.rs)
/// - Persisted preferences (preferences.rs)
/// - Light/dark theme state (theme.rs)

pub mod catalog;
pub mod data;
pub mod preferences;
pub mod service;
pub mod theme;
