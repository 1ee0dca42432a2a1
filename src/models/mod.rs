pub mod common;
pub mod definition;
pub mod workload;
