// Background plumbing: polling timers, refresh broadcasts, request accounting

pub mod metered_api;
pub mod polling;
pub mod refresh_hub;

pub use metered_api::MeteredApi;
pub use polling::{PollSubscription, PollTarget, PollingService};
pub use refresh_hub::{RefreshHub, RefreshSignal, RefreshTopic};
