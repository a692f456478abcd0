pub mod plan;
pub mod prompt;
