pub mod discovery;
pub mod exif_reader;
pub mod extraction;
pub mod control_points;

pub use discovery::*;
pub use exif_reader::*;
pub use extraction::*;
pub use control_points::*;
