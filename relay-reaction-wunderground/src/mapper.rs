// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Maps device telemetry payloads onto Weather Underground upload parameters.
//!
//! Devices publish a form-encoded body with short keys:
//!
//! | device key | upload parameter | meaning |
//! |---|---|---|
//! | `tf` | `tempf` | temperature, °F |
//! | `df` | `dewptf` | dew point, °F |
//! | `h` | `humidity` | relative humidity, % |
//! | `b` | `baromin` | barometric pressure, inHg |
//!
//! Values are copied as opaque strings.

use std::collections::BTreeMap;
use std::str::Utf8Error;

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::config::WundergroundConfig;

/// Device field key to upload parameter name.
const FIELD_MAP: [(&str, &str); 4] = [
    ("tf", "tempf"),
    ("df", "dewptf"),
    ("h", "humidity"),
    ("b", "baromin"),
];

/// Every parameter present in an [`UplinkRequest`].
pub const PARAMETER_NAMES: [&str; 9] = [
    "ID",
    "PASSWORD",
    "dateutc",
    "tempf",
    "dewptf",
    "humidity",
    "baromin",
    "softwaretype",
    "action",
];

/// Reasons a payload could not be decoded.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload or decoded value is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    #[error("invalid percent escape {0:?}")]
    InvalidEscape(String),

    #[error("invalid semicolon separator in pair {0:?}")]
    Semicolon(String),
}

/// Decoded key/value pairs in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(Vec<(String, String)>);

impl FieldSet {
    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Query parameters for a single station upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UplinkRequest {
    params: BTreeMap<&'static str, String>,
}

impl UplinkRequest {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Form-encode the parameters, sorted by key.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.params {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

/// Decode a form-encoded payload.
///
/// Stricter than [`form_urlencoded::parse`]: a `%` must be followed by two
/// hex digits, `;` is rejected as a separator, and escapes that decode to
/// bytes which are not UTF-8 are an error instead of being replaced.
pub fn decode_fields(payload: &[u8]) -> Result<FieldSet, DecodeError> {
    let text = std::str::from_utf8(payload)?;

    let mut fields = Vec::new();
    for pair in text.split('&').filter(|p| !p.is_empty()) {
        if pair.contains(';') {
            return Err(DecodeError::Semicolon(pair.to_string()));
        }
        check_escapes(pair)?;
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        fields.push((decode_component(key)?, decode_component(value)?));
    }
    Ok(FieldSet(fields))
}

fn decode_component(raw: &str) -> Result<String, DecodeError> {
    let spaced = raw.replace('+', " ");
    Ok(percent_decode_str(&spaced).decode_utf8()?.into_owned())
}

fn check_escapes(pair: &str) -> Result<(), DecodeError> {
    let bytes = pair.as_bytes();
    for (i, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            let end = (i + 3).min(bytes.len());
            return Err(DecodeError::InvalidEscape(
                String::from_utf8_lossy(&bytes[i..end]).into_owned(),
            ));
        }
    }
    Ok(())
}

/// Build the upload request for a telemetry payload.
///
/// Missing device fields are sent as empty strings so every parameter in
/// [`PARAMETER_NAMES`] is always present.
pub fn remap(payload: &[u8], config: &WundergroundConfig) -> Result<UplinkRequest, DecodeError> {
    let fields = decode_fields(payload)?;

    let mut params = BTreeMap::new();
    params.insert("ID", config.station_id.clone());
    params.insert("PASSWORD", config.password.clone());
    params.insert("dateutc", "now".to_string());
    for (field, param) in FIELD_MAP {
        params.insert(param, fields.get(field).unwrap_or_default().to_string());
    }
    params.insert("softwaretype", config.software_type.clone());
    params.insert("action", config.action.clone());

    Ok(UplinkRequest { params })
}
