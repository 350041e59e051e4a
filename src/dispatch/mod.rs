//! Dispatch Module
//!
//! Transport-neutral action routing: validation, store calls and envelopes.

mod action;
mod dispatcher;

pub use action::Action;
pub use dispatcher::RequestDispatcher;
