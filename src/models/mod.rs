pub mod email;
pub mod report;

pub use email::*;
pub use report::*;
