pub mod calendar;
pub mod forecast;
pub mod help;
pub mod metrics;
pub mod models;
