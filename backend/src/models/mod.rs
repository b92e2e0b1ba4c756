pub mod heatmap;
pub mod macros;
pub mod property;
pub mod time;

pub use heatmap::*;
pub use property::*;
pub use time::*;
