pub mod annotator;
mod errors;
pub mod generator;
pub mod instructions;

pub use annotator::*;
pub use errors::*;
pub use generator::*;
pub use instructions::*;
