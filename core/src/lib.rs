pub mod auth;
pub mod chapters;
pub mod characters;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod outlines;
pub mod polish;
pub mod projects;
pub mod settings;
pub mod stream;
pub mod styles;
pub mod telemetry;
pub mod types;
pub mod wizard;


pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use notify::{Notifier, TracingNotifier};
pub use stream::{
    CancellationToken, GeneratedText, StreamNotice, StreamOptions, StreamOutcome, StreamSummary,
};
pub use styles::StyleCatalog;
