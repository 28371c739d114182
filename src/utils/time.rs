use chrono::{DateTime, Utc};
use tokio::time::Instant;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
