mod answer;
mod asset;
mod visit;

pub use answer::*;
pub use asset::*;
pub use visit::*;
