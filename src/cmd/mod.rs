pub mod check;
pub mod config;
pub mod normalize;
pub mod plan;
pub mod ticket;
