pub mod form;
pub mod metrics;
pub mod profile;
pub mod wizard;
