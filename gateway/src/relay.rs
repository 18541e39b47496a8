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

//! The pull → remap → upload → acknowledge loop.

use std::fmt;

use log::{error, info, warn};
use relay_reaction_wunderground::{remap, TransportError, UplinkClient, WundergroundConfig};
use relay_source_pubsub::{InboundMessage, MessageSource};

/// When a processed message is acknowledged.
///
/// The default acknowledges every upload that got an HTTP response and
/// leaves undecodable payloads pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Leave messages pending when the upload endpoint answers with a non-2xx status.
    pub rejection_is_failure: bool,
    /// Acknowledge undecodable payloads instead of leaving them for redelivery.
    pub ack_undecodable: bool,
}

/// Counters for one run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub received: u64,
    pub forwarded: u64,
    pub rejected: u64,
    pub undecodable: u64,
    pub failed: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "received={} forwarded={} rejected={} undecodable={} failed={}",
            self.received, self.forwarded, self.rejected, self.undecodable, self.failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Forwarded,
    Rejected,
    Undecodable,
    Failed,
}

/// Forwards station telemetry from a [`MessageSource`] to Weather Underground.
pub struct Relay {
    station: WundergroundConfig,
    uplink: UplinkClient,
    policy: DeliveryPolicy,
}

impl Relay {
    pub fn new(station: WundergroundConfig, policy: DeliveryPolicy) -> Result<Self, TransportError> {
        let uplink = UplinkClient::new(&station)?;
        Ok(Self {
            station,
            uplink,
            policy,
        })
    }

    /// Process messages one at a time until the source stops, is exhausted,
    /// or fails to produce the next message.
    pub async fn run<S: MessageSource + ?Sized>(&self, source: &mut S) -> RunSummary {
        let stop = source.stop_handle();
        let mut summary = RunSummary::default();

        while !stop.is_stopped() {
            let msg = match source.next().await {
                Ok(Some(msg)) => msg,
                Ok(None) => break,
                Err(e) => {
                    error!("[relay] Error getting next message: {e}");
                    break;
                }
            };

            summary.received += 1;
            match self.handle(msg).await {
                Outcome::Forwarded => summary.forwarded += 1,
                Outcome::Rejected => summary.rejected += 1,
                Outcome::Undecodable => summary.undecodable += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }

        summary
    }

    async fn handle(&self, msg: InboundMessage) -> Outcome {
        info!(
            "[relay] Got message {} (device_id={}, event={}, published_at={}): {}",
            msg.id,
            msg.attribute("device_id").unwrap_or("-"),
            msg.attribute("event").unwrap_or("-"),
            msg.attribute("published_at").unwrap_or("-"),
            String::from_utf8_lossy(&msg.payload)
        );

        let req = match remap(&msg.payload, &self.station) {
            Ok(req) => req,
            Err(e) => {
                warn!("[relay] Dropping message {}: {e}", msg.id);
                if self.policy.ack_undecodable {
                    acknowledge(msg).await;
                }
                return Outcome::Undecodable;
            }
        };

        let status = match self.uplink.send(&req).await {
            Ok(status) => status,
            Err(e) => {
                error!("[relay] Upload failed for message {}: {e}", msg.id);
                return Outcome::Failed;
            }
        };

        if status.is_success() {
            acknowledge(msg).await;
            return Outcome::Forwarded;
        }
        if !self.policy.rejection_is_failure {
            acknowledge(msg).await;
        }
        Outcome::Rejected
    }
}

async fn acknowledge(msg: InboundMessage) {
    let id = msg.id.clone();
    if let Err(e) = msg.ack().await {
        error!("[relay] Failed to acknowledge message {id}: {e}");
    }
}
