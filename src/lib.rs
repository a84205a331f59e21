//! Terminal task manager: live process, user, detail and service tables
//! with filtering, sorting and process/service control.

pub mod action;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod format;
pub mod logging;
pub mod scheduler;
pub mod state;
pub mod surface;
pub mod system;
pub mod ui;
pub mod view;
