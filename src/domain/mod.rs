pub mod cart;
pub mod catalog;
pub mod lifecycle;
pub mod pricing;
pub mod subscription;
