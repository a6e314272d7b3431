pub mod ai;
pub mod app;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod logging;
pub mod pane;
pub mod prompts;
pub mod save;
pub mod target;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use ai::OpenAIClient;
pub use app::App;
pub use config::Config;
pub use dispatcher::{Dispatch, Dispatcher, GenerationEvent, GenerationOutcome};
pub use error::GenerationError;
pub use prompts::GenerationRequest;
pub use target::Target;
