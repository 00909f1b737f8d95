// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds CLI parsing and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod entry;
pub mod error;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod runtime;
pub mod session;
pub mod ui;

pub use app::App;
pub use session::Session;
