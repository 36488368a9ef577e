pub mod elements;
pub mod error;
pub mod orbit;
pub mod pass;
pub mod position;
