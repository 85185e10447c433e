//! String-format variants: `time`, `date`, `date-time` and `uuid`.
//!
//! The temporal variants render "now" moved back by [`backdate_offset`]:
//! the product of a uniform millisecond draw below one hour and a uniform
//! integer draw below 24. The product is skewed toward small offsets and
//! always stays under 23 hours.

use chrono::{DateTime, Duration, Local, SecondsFormat, TimeZone, Utc};
use rand::{Rng, RngCore};
use serde_json::Value;

use super::Generator;
use crate::error::GenerateError;

const OFFSET_MILLIS_BOUND: i64 = 3_600_000;
const OFFSET_FACTOR_BOUND: i64 = 24;

/// Backward offset applied to "now" by the temporal variants.
pub fn backdate_offset(rng: &mut dyn RngCore) -> Duration {
    let millis = rng.gen_range(0..OFFSET_MILLIS_BOUND);
    let factor = rng.gen_range(0..OFFSET_FACTOR_BOUND);
    Duration::milliseconds(millis * factor)
}

/// `now` moved back by [`backdate_offset`].
pub fn backdated<Tz: TimeZone>(now: DateTime<Tz>, rng: &mut dyn RngCore) -> DateTime<Tz> {
    now - backdate_offset(rng)
}

/// Local time of day with zone offset, e.g. `14:03:59+0200`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeGenerator;

impl TimeGenerator {
    /// Render the time for a given "now".
    pub fn render<Tz>(now: DateTime<Tz>, rng: &mut dyn RngCore) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        backdated(now, rng).format("%H:%M:%S%z").to_string()
    }
}

impl Generator for TimeGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        Ok(Value::String(Self::render(Local::now(), rng)))
    }
}

/// Calendar date, e.g. `2024-05-17`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateGenerator;

impl Generator for DateGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let date = backdated(Local::now(), rng).format("%Y-%m-%d").to_string();
        Ok(Value::String(date))
    }
}

/// RFC 3339 timestamp in UTC with seconds precision, e.g.
/// `2024-05-17T12:03:59Z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeGenerator;

impl Generator for DateTimeGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let stamp = backdated(Utc::now(), rng).to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(Value::String(stamp))
    }
}

/// Random (version 4) UUID drawn from the randomness source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl Generator for UuidGenerator {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GenerateError> {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Ok(Value::String(id.to_string()))
    }
}
