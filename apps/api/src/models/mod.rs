pub mod brand;
pub mod platform;
pub mod result;
