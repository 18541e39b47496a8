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

//! Relay settings read from the process environment.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use relay_reaction_wunderground::{WundergroundConfig, DEFAULT_ENDPOINT};
use relay_source_pubsub::PubsubSourceConfig;
use url::Url;

use crate::relay::DeliveryPolicy;

const DEFAULT_PROJECT: &str = "particle-gcp-playground";
const DEFAULT_TOPIC: &str = "weather";
const DEFAULT_SUBSCRIPTION: &str = "wundergroundPusher";

#[derive(Debug, Clone)]
pub struct Settings {
    pub source: PubsubSourceConfig,
    pub uplink: WundergroundConfig,
    pub policy: DeliveryPolicy,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut source = PubsubSourceConfig::builder(
            "pubsub-src",
            var("PUBSUB_PROJECT_ID").unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
            var("PUBSUB_TOPIC").unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            var("PUBSUB_SUBSCRIPTION").unwrap_or_else(|| DEFAULT_SUBSCRIPTION.to_string()),
        );
        if let Some(path) = var("PUBSUB_CREDENTIALS_FILE") {
            source = source.credentials_file(path);
        }
        if let Some(batch) = var("PUBSUB_PULL_BATCH") {
            let batch = batch
                .trim()
                .parse::<i32>()
                .with_context(|| format!("Invalid PUBSUB_PULL_BATCH '{batch}'"))?;
            source = source.pull_batch_size(batch);
        }
        if let Some(secs) = var("PUBSUB_ACK_DEADLINE_SECS") {
            let secs = secs
                .trim()
                .parse::<i32>()
                .with_context(|| format!("Invalid PUBSUB_ACK_DEADLINE_SECS '{secs}'"))?;
            source = source.ack_deadline_seconds(secs);
        }

        let endpoint = var("WU_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Url::parse(&endpoint).with_context(|| format!("Invalid WU_ENDPOINT '{endpoint}'"))?;

        let mut uplink = WundergroundConfig::builder("wu-uplink")
            .endpoint(endpoint)
            .station_id(lookup("WU_STATION_ID").unwrap_or_default())
            .password(lookup("WU_PASSWORD").unwrap_or_default());
        if let Some(secs) = var("WU_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid WU_TIMEOUT_SECS '{secs}'"))?;
            uplink = uplink.timeout(Duration::from_secs(secs));
        }

        let flag = |name: &str| parse_flag(name, var(name));
        let policy = DeliveryPolicy {
            rejection_is_failure: flag("RELAY_REJECTION_IS_FAILURE")?,
            ack_undecodable: flag("RELAY_ACK_UNDECODABLE")?,
        };

        Ok(Settings {
            source: source.build(),
            uplink: uplink.build(),
            policy,
        })
    }
}

fn parse_flag(name: &str, value: Option<String>) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("Invalid {name} '{other}', expected true or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();

        assert_eq!(s.source.project_id, DEFAULT_PROJECT);
        assert_eq!(s.source.topic, "weather");
        assert_eq!(s.source.subscription, "wundergroundPusher");
        assert!(s.source.credentials_file.is_none());
        assert_eq!(s.source.pull_batch_size, 1);
        assert_eq!(s.source.ack_deadline_seconds, 60);
        assert_eq!(s.uplink.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(s.uplink.station_id, "");
        assert_eq!(s.uplink.password, "");
        assert!(s.uplink.timeout.is_none());
        assert!(!s.policy.rejection_is_failure);
        assert!(!s.policy.ack_undecodable);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("PUBSUB_PROJECT_ID", "wx-prod"),
            ("PUBSUB_CREDENTIALS_FILE", "/etc/relay/sa.json"),
            ("PUBSUB_PULL_BATCH", "25"),
            ("PUBSUB_ACK_DEADLINE_SECS", "120"),
            ("WU_STATION_ID", "KCASANFR5"),
            ("WU_PASSWORD", "key"),
            ("WU_TIMEOUT_SECS", "15"),
            ("RELAY_REJECTION_IS_FAILURE", "TRUE"),
            ("RELAY_ACK_UNDECODABLE", "1"),
        ])
        .unwrap();

        assert_eq!(s.source.project_id, "wx-prod");
        assert_eq!(s.source.credentials_file.as_deref(), Some("/etc/relay/sa.json"));
        assert_eq!(s.source.pull_batch_size, 25);
        assert_eq!(s.source.ack_deadline_seconds, 120);
        assert_eq!(s.uplink.station_id, "KCASANFR5");
        assert_eq!(s.uplink.password, "key");
        assert_eq!(s.uplink.timeout, Some(Duration::from_secs(15)));
        assert!(s.policy.rejection_is_failure);
        assert!(s.policy.ack_undecodable);
    }

    #[test]
    fn test_invalid_values() {
        assert!(settings(&[("PUBSUB_PULL_BATCH", "ten")]).is_err());
        assert!(settings(&[("PUBSUB_ACK_DEADLINE_SECS", "1m")]).is_err());
        assert!(settings(&[("WU_TIMEOUT_SECS", "-1")]).is_err());
        assert!(settings(&[("WU_ENDPOINT", "weatherstation")]).is_err());
        assert!(settings(&[("RELAY_ACK_UNDECODABLE", "maybe")]).is_err());
    }
}
