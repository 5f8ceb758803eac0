//! Session core of the Beehive dashboard: identity, polling chat and the
//! admin notification center, driven over plain HTTP interval polling.

pub mod chat;
pub mod common;
pub mod config;
pub mod network;
pub mod notifications;
pub mod runtime;
pub mod session;
pub mod storage;

pub use runtime::{DashboardRuntime, PollSettings};
