use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};

/// Session lifetime in hours, counted from login.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Length of the random part of a session token
const TOKEN_RANDOM_LEN: usize = 11;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Persisted proof of login. Serialised as `{username, loginTime, token}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub username: String,
    #[serde(serialize_with = "serialize_millis")]
    pub login_time: DateTime<Utc>,
    pub token: String,
}

impl SessionRecord {
    /// `login_time` is kept to millisecond precision, the precision it is
    /// stored with.
    pub fn new(username: &str, login_time: DateTime<Utc>) -> Self {
        let login_time = login_time.trunc_subsecs(3);
        Self {
            username: username.to_string(),
            login_time,
            token: generate_token(login_time),
        }
    }

    /// Saturates at the latest representable time for far-future logins
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.login_time
            .checked_add_signed(Duration::hours(SESSION_TTL_HOURS))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Expired strictly after the 24h mark; exactly 24h old is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.login_time > Duration::hours(SESSION_TTL_HOURS)
    }

    pub fn time_until_expiry_at(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at() - now
    }

    /// Minutes remaining (for display), never negative
    pub fn minutes_until_expiry_at(&self, now: DateTime<Utc>) -> i64 {
        self.time_until_expiry_at(now).num_minutes().max(0)
    }
}

/// Build a session token: a random base-36 fragment followed by the login
/// time in base-36 milliseconds.
///
/// The token only distinguishes one login from another. It is not a
/// secret and nothing may authorise against it.
pub fn generate_token(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let mut token: String = (0..TOKEN_RANDOM_LEN)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect();
    token.push_str(&to_base36(now.timestamp_millis().max(0) as u64));
    token
}

/// ISO-8601 with milliseconds and a `Z` suffix, as browsers write it
fn serialize_millis<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
