pub mod bpp;
pub mod spp;

pub use bpp::BPInstance;
pub use spp::{SPInstance, Strip};
