pub mod normalize;
pub mod containment;

pub use normalize::*;
pub use containment::*;
