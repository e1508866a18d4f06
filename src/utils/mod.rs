pub mod time;

pub use time::{parse_relative_date, sleep_with_jitter};
