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

//! Google Cloud Pub/Sub implementation of [`MessageSource`].

use std::collections::VecDeque;

use async_trait::async_trait;
use google_cloud_pubsub::client::google_cloud_auth::credentials::CredentialsFile;
use google_cloud_pubsub::client::{Client, ClientConfig};
use google_cloud_pubsub::subscriber::ReceivedMessage;
use google_cloud_pubsub::subscription::{Subscription, SubscriptionConfig};
use log::{debug, info, warn};

use crate::config::PubsubSourceConfig;
use crate::error::{Result, SourceError};
use crate::message::{Acknowledger, InboundMessage, MessageSource, StopHandle};

/// Pull-based Pub/Sub source.
///
/// Messages are requested in batches of `pull_batch_size` and handed out one
/// at a time; each message's ack deadline is restarted as it is handed out. A pull blocks until the service returns at least one message or
/// the source is stopped.
pub struct PubsubSource {
    config: PubsubSourceConfig,
    subscription: Subscription,
    buffered: VecDeque<ReceivedMessage>,
    stop: StopHandle,
}

impl PubsubSource {
    /// Connect to Pub/Sub and make sure the subscription is ready.
    ///
    /// Fails if the topic does not exist; topics are never created here.
    /// A missing subscription is created against the topic with default
    /// delivery settings apart from the configured ack deadline.
    pub async fn connect(config: PubsubSourceConfig) -> Result<Self> {
        info!(
            "[{}] Connecting to Pub/Sub (project={}, topic={}, subscription={})",
            config.id, config.project_id, config.topic, config.subscription
        );

        let mut client_config = match &config.credentials_file {
            Some(path) => {
                let credentials = CredentialsFile::new_from_file(path.clone())
                    .await
                    .map_err(|e| SourceError::Credentials(format!("{path}: {e}")))?;
                ClientConfig::default()
                    .with_credentials(credentials)
                    .await
                    .map_err(|e| SourceError::Credentials(e.to_string()))?
            }
            None => ClientConfig::default()
                .with_auth()
                .await
                .map_err(|e| SourceError::Credentials(e.to_string()))?,
        };
        client_config.project_id = Some(config.project_id.clone());

        let client = Client::new(client_config)
            .await
            .map_err(|e| SourceError::Client(e.to_string()))?;

        let topic = client.topic(&config.topic);
        let topic_exists = topic.exists(None).await.map_err(|e| {
            SourceError::Topic(format!("could not check topic '{}': {e}", config.topic))
        })?;
        if !topic_exists {
            return Err(SourceError::TopicMissing(config.topic.clone()));
        }

        let subscription = client.subscription(&config.subscription);
        let subscription_exists = subscription.exists(None).await.map_err(|e| {
            SourceError::Subscription(format!(
                "could not check subscription '{}': {e}",
                config.subscription
            ))
        })?;
        if !subscription_exists {
            subscription
                .create(topic.fully_qualified_name(), subscription_config(&config), None)
                .await
                .map_err(|e| {
                    SourceError::Subscription(format!(
                        "could not create subscription '{}': {e}",
                        config.subscription
                    ))
                })?;
            info!(
                "[{}] Created subscription '{}' on topic '{}'",
                config.id, config.subscription, config.topic
            );
        }

        Ok(Self {
            config,
            subscription,
            buffered: VecDeque::new(),
            stop: StopHandle::new(),
        })
    }

    async fn fill(&mut self) -> Result<bool> {
        while self.buffered.is_empty() {
            let pulled = tokio::select! {
                biased;
                _ = self.stop.stopped() => return Ok(false),
                pulled = self.subscription.pull(self.config.pull_batch_size, None) => pulled,
            };
            let batch = pulled.map_err(|e| SourceError::Pull(e.to_string()))?;
            debug!("[{}] Pulled {} message(s)", self.config.id, batch.len());
            self.buffered.extend(batch);
        }
        Ok(true)
    }
}

#[async_trait]
impl MessageSource for PubsubSource {
    async fn next(&mut self) -> Result<Option<InboundMessage>> {
        if self.stop.is_stopped() || !self.fill().await? {
            return Ok(None);
        }
        let Some(received) = self.buffered.pop_front() else {
            return Ok(None);
        };

        let id = received.message.message_id.clone();

        // Restart the lease so messages that waited in the batch do not
        // expire while earlier ones are being forwarded.
        if let Err(e) = received
            .modify_ack_deadline(self.config.ack_deadline_seconds)
            .await
        {
            warn!("[{}] Could not extend ack deadline of {id}: {e}", self.config.id);
        }
        let payload = received.message.data.clone();
        let attributes = received.message.attributes.clone();
        Ok(Some(InboundMessage::new(
            id,
            payload,
            attributes,
            Box::new(PubsubAck(received)),
        )))
    }

    fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

fn subscription_config(config: &PubsubSourceConfig) -> SubscriptionConfig {
    SubscriptionConfig {
        ack_deadline_seconds: config.ack_deadline_seconds,
        ..SubscriptionConfig::default()
    }
}

struct PubsubAck(ReceivedMessage);

#[async_trait]
impl Acknowledger for PubsubAck {
    async fn ack(&self) -> Result<()> {
        self.0
            .ack()
            .await
            .map_err(|e| SourceError::Ack(e.to_string()))
    }
}
