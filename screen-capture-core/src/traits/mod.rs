pub mod audio_graph;
pub mod display_capture;
pub mod download_target;
pub mod encoder;
pub mod microphone_capture;
pub mod session_delegate;
