pub mod controls;
#[cfg(windows)]
mod painting;
#[cfg(windows)]
mod theme;
#[cfg(windows)]
mod window;

#[cfg(windows)]
pub use window::{create_window, show_window};
