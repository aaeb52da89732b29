// Shared data types: persisted document rows and in-memory chat turns.

pub mod chat;
pub mod document;
