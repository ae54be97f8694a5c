pub mod backoff;
pub mod staleness;
