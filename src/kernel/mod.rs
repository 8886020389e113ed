pub mod action;
pub mod collaborators;
pub mod context;
pub mod dispatcher;
pub mod input;
pub mod knowledge;
pub mod matcher;
pub mod notes;
pub mod screenshot;
pub mod telemetry;
pub mod utterance;
