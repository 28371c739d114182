use chrono::Utc;
use uuid::Uuid;

pub const TEST_EMAIL_DOMAIN: &str = "example.com";

/// Username unique to this run: `{prefix}_{unix seconds}_{6 hex}`.
///
/// The random tail keeps two identities created within the same second apart.
pub fn unique_username(prefix: &str) -> String {
    let tail = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, Utc::now().timestamp(), &tail[..6])
}

pub fn email_for(username: &str) -> String {
    format!("{}@{}", username, TEST_EMAIL_DOMAIN)
}
