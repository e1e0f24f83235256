mod station;
mod timeline;

pub use station::*;
pub use timeline::*;
