//! Application state and session control

pub mod state;

pub use state::{App, Mode};
