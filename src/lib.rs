//! City weather dashboard client
//!
//! This library exposes the client's modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod conditions;
pub mod config;
pub mod effect;
pub mod logging;
pub mod page;
pub mod reducer;
pub mod runner;
pub mod state;
