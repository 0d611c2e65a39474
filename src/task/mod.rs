mod generator;
mod params;
mod url;

pub use generator::generate_tasks;
pub use params::{TableCriterion, TaskParameters};
