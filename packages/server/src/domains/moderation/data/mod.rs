pub mod contribution;
pub mod dashboard;

pub use contribution::*;
pub use dashboard::*;
