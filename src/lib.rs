pub mod api;
pub mod core;
pub mod metrics;
pub mod models;
pub mod notification;
pub mod templates;

// Re-export commonly used types
pub use crate::core::{AppConfig, RenderConfig, ShowtimesError, ShowtimesResult};
pub use models::{Movie, NotificationEmail, Report, Screening};
pub use notification::EmailComposer;
pub use templates::ShowtimesRenderer;
