pub mod asset;
pub mod traits;

pub use asset::*;
pub use traits::*;
