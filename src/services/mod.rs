pub mod ai;
pub mod diet_plan;
