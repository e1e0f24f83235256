mod feed;
mod stations;
mod trains;

pub use feed::*;
pub use stations::*;
pub use trains::*;
