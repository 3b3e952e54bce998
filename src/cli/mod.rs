pub mod app;
pub mod commands;
pub mod dispatch;
pub mod env;
pub mod output;
pub mod prompts;
pub mod render;
pub mod resolve;
pub mod runtime;
pub mod script;
pub mod sites;
pub mod transfer;

pub use app::run;
pub use env::CliArgs;
pub use output::OutputFormat;
