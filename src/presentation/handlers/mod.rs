mod generate;
mod health;

pub use generate::{MISSING_QUERY_MESSAGE, generate_handler};
pub use health::health_handler;
