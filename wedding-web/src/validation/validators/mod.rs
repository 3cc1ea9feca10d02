pub mod duplicate;
pub mod reference;
