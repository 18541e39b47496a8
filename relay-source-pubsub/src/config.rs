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

//! Configuration types for the Pub/Sub source.

use serde::Deserialize;

/// Configuration for the Pub/Sub source.
#[derive(Debug, Clone, Deserialize)]
pub struct PubsubSourceConfig {
    /// Identifier used to prefix log lines from this source.
    pub id: String,
    /// Google Cloud project that owns the topic and subscription.
    pub project_id: String,
    /// Path to a service-account credentials file. When absent, the ambient
    /// Google credentials (`GOOGLE_APPLICATION_CREDENTIALS`, metadata server) are used.
    pub credentials_file: Option<String>,
    /// Topic the subscription is bound to. Must already exist.
    pub topic: String,
    /// Subscription to pull from. Created against `topic` if missing.
    pub subscription: String,
    /// Maximum number of messages requested per pull (default: 1).
    pub pull_batch_size: i32,
    /// Ack deadline set on a newly created subscription and re-applied to
    /// each message when it is handed out (default: 60, range 10..=600).
    pub ack_deadline_seconds: i32,
}

impl PubsubSourceConfig {
    /// Start building a new config with the required fields.
    pub fn builder(
        id: impl Into<String>,
        project_id: impl Into<String>,
        topic: impl Into<String>,
        subscription: impl Into<String>,
    ) -> PubsubSourceConfigBuilder {
        PubsubSourceConfigBuilder {
            id: id.into(),
            project_id: project_id.into(),
            topic: topic.into(),
            subscription: subscription.into(),
            credentials_file: None,
            pull_batch_size: 1,
            ack_deadline_seconds: 60,
        }
    }
}

/// Builder for [`PubsubSourceConfig`].
pub struct PubsubSourceConfigBuilder {
    id: String,
    project_id: String,
    topic: String,
    subscription: String,
    credentials_file: Option<String>,
    pull_batch_size: i32,
    ack_deadline_seconds: i32,
}

impl PubsubSourceConfigBuilder {
    pub fn credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Values below 1 are clamped to 1.
    pub fn pull_batch_size(mut self, size: i32) -> Self {
        self.pull_batch_size = size.max(1);
        self
    }

    /// Clamped to the 10..=600 seconds Pub/Sub accepts.
    pub fn ack_deadline_seconds(mut self, seconds: i32) -> Self {
        self.ack_deadline_seconds = seconds.clamp(10, 600);
        self
    }

    /// Build the config.
    pub fn build(self) -> PubsubSourceConfig {
        PubsubSourceConfig {
            id: self.id,
            project_id: self.project_id,
            credentials_file: self.credentials_file,
            topic: self.topic,
            subscription: self.subscription,
            pull_batch_size: self.pull_batch_size,
            ack_deadline_seconds: self.ack_deadline_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config =
            PubsubSourceConfig::builder("pubsub-src", "my-project", "weather", "wundergroundPusher")
                .build();

        assert_eq!(config.id, "pubsub-src");
        assert_eq!(config.project_id, "my-project");
        assert_eq!(config.topic, "weather");
        assert_eq!(config.subscription, "wundergroundPusher");
        assert!(config.credentials_file.is_none());
        assert_eq!(config.pull_batch_size, 1);
        assert_eq!(config.ack_deadline_seconds, 60);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PubsubSourceConfig::builder("src", "p", "t", "s")
            .credentials_file("/etc/relay/sa.json")
            .pull_batch_size(0)
            .ack_deadline_seconds(5)
            .build();

        assert_eq!(config.credentials_file.as_deref(), Some("/etc/relay/sa.json"));
        assert_eq!(config.pull_batch_size, 1);
        assert_eq!(config.ack_deadline_seconds, 10);

        let config = PubsubSourceConfig::builder("src", "p", "t", "s")
            .ack_deadline_seconds(3600)
            .build();
        assert_eq!(config.ack_deadline_seconds, 600);
    }
}
