use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct EchoRequest {
    /// Text to send back.
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EchoResponse {
    pub message: String,
}

#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct FormatNumberRequest {
    /// Number to format. Numeric strings such as `"1500"` or `"NaN"` are
    /// accepted too, so non-finite values can be expressed in JSON.
    #[serde(deserialize_with = "lenient_f64")]
    #[schemars(with = "f64")]
    pub value: f64,
    /// Fixed decimals for non-integers below one thousand. Defaults to 2.
    #[serde(default)]
    #[schemars(range(max = 10))]
    pub decimal_places: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormatNumberResponse {
    pub formatted: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema)]
pub struct HealthParams {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
    pub uptime_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<String>>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct NumberVisitor;

    impl de::Visitor<'_> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim()
                .parse::<f64>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}
