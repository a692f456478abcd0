pub mod document;
pub mod plan;
pub mod provider;
pub mod ticket;
