pub mod api;
pub mod client;
pub mod error;
pub mod poller;

pub use api::{DashboardApi, NotificationPage, OutgoingMessage};
pub use client::ApiClient;
pub use error::ApiError;
pub use poller::Poller;
