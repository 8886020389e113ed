pub mod battery;
pub mod console;
pub mod desktop;
pub mod knowledge;
pub mod media;
pub mod speech;
pub mod transcription;
