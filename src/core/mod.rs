pub mod calendar_math;
pub mod converter;
pub mod engine;
pub mod record;
pub mod types;
