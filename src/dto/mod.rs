pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod orders;
pub mod subscriptions;
