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

//! Weather Underground reaction for the weather relay.
//!
//! Turns device telemetry payloads into personal-weather-station uploads
//! and sends them to the Weather Underground upload endpoint.
//!
//! # Example
//!
//! ```ignore
//! use relay_reaction_wunderground::{remap, UplinkClient, WundergroundConfig};
//!
//! let config = WundergroundConfig::builder("wu-uplink")
//!     .station_id("KCASANFR5")
//!     .password("station-key")
//!     .build();
//!
//! let client = UplinkClient::new(&config)?;
//! let req = remap(b"tf=72.5&df=61.0&h=70&b=30.1", &config)?;
//! let status = client.send(&req).await?;
//! ```

pub mod config;
pub mod mapper;
pub mod publisher;

pub use config::{WundergroundConfig, WundergroundConfigBuilder, DEFAULT_ENDPOINT};
pub use mapper::{decode_fields, remap, DecodeError, FieldSet, UplinkRequest, PARAMETER_NAMES};
pub use publisher::{TransportError, UplinkClient};
