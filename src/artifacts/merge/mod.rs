pub mod ancestry;
pub mod resolution;
