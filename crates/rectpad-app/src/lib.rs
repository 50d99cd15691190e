//! Rectpad Application
//!
//! The application shell: windowing, pointer and touch routing, and the
//! color palette wired to the canvas surface.

mod alert;
mod app;
mod event_handler;
mod ui;

pub use app::{App, AppConfig, AppError};
pub use event_handler::EventHandler;
pub use ui::{UiAction, UiState, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
