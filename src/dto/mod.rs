pub mod chat;
pub mod orders;
pub mod products;
pub mod support;
