// DataFrame implementations module
pub mod base;

pub use base::DataFrame;
