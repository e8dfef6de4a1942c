pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod job_filter;
pub mod error;

pub use types::*;
pub use filter::Filter;
pub use job_filter::{JobFilter, JobQuery, SalaryRange};
