pub mod geo;
pub mod time;
pub mod window;

pub use geo::*;
pub use time::*;
pub use window::*;
