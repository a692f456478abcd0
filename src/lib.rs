//! Test plan synthesis for tracker tickets.
//!
//! A ticket is fetched from the tracker and flattened into a canonical
//! [`domain::ticket::Ticket`], combined with a template into a prompt, and
//! sent to one of the registered generation providers.

pub mod cmd;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use context::AppContext;
pub use error::{AppError, AppResult};
pub use workflow::plan::{PlanRequest, PlanSynthesizer};
