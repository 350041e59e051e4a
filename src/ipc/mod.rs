//! IPC Module
//!
//! Byte-stream transport: newline-framed JSON requests and envelopes over TCP.

mod server;

pub use server::IpcServer;
