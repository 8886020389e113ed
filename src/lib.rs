pub mod audio;
pub mod config;
pub mod kernel;
pub mod outputs;
pub mod services;

pub use kernel::dispatcher::{Collaborators, Dispatcher, TurnOutcome};
