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

//! Configuration types for the Weather Underground reaction.

use std::time::Duration;

use serde::Deserialize;

/// Station upload endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str =
    "https://weatherstation.wunderground.com/weatherstation/updateweatherstation.php";

/// Configuration for the Weather Underground reaction.
#[derive(Debug, Clone, Deserialize)]
pub struct WundergroundConfig {
    /// Identifier used to prefix log lines from this reaction.
    pub id: String,
    /// Upload endpoint (default: [`DEFAULT_ENDPOINT`]).
    pub endpoint: String,
    /// Personal weather station ID, sent as `ID` (default: empty).
    pub station_id: String,
    /// Station key, sent as `PASSWORD` (default: empty).
    pub password: String,
    /// Sent as `softwaretype` (default: `"Particle-Photon"`).
    pub software_type: String,
    /// Sent as `action` (default: `"updateraw"`).
    pub action: String,
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl WundergroundConfig {
    /// Start building a new config.
    pub fn builder(id: impl Into<String>) -> WundergroundConfigBuilder {
        WundergroundConfigBuilder {
            id: id.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            station_id: String::new(),
            password: String::new(),
            software_type: "Particle-Photon".to_string(),
            action: "updateraw".to_string(),
            timeout: None,
        }
    }
}

/// Builder for [`WundergroundConfig`].
pub struct WundergroundConfigBuilder {
    id: String,
    endpoint: String,
    station_id: String,
    password: String,
    software_type: String,
    action: String,
    timeout: Option<Duration>,
}

impl WundergroundConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn station_id(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = station_id.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn software_type(mut self, software_type: impl Into<String>) -> Self {
        self.software_type = software_type.into();
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the config.
    pub fn build(self) -> WundergroundConfig {
        WundergroundConfig {
            id: self.id,
            endpoint: self.endpoint,
            station_id: self.station_id,
            password: self.password,
            software_type: self.software_type,
            action: self.action,
            timeout: self.timeout,
        }
    }
}
