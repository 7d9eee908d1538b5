pub mod geodesy;
pub mod orthographic;

pub use geodesy::*;
pub use orthographic::*;
