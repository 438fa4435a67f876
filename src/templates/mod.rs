pub mod engine;
pub mod helpers;

pub use engine::{ShowtimesRenderer, SHOWTIMES_TEMPLATE};
