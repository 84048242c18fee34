pub mod analytics;
pub mod http;
pub mod in_memory;
pub mod risk;
pub mod sandbox;
