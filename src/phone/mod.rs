pub mod normalize;
pub mod scan;

pub use normalize::{Normalizer, RegionPrefix, Rejection};
pub use scan::Scanner;
