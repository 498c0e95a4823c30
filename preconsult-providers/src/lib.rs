pub mod chat;
pub mod elevenlabs;
pub mod parse;
pub mod request;
pub mod runtime;
