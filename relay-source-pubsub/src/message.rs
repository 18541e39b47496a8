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

//! Transport-neutral message types shared by every source.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Settles a single delivery with the broker.
#[async_trait]
pub trait Acknowledger: Send + Sync {
    async fn ack(&self) -> Result<()>;
}

/// A message pulled from a subscription.
///
/// The payload and attributes are owned copies; the acknowledgment handle is
/// consumed by [`InboundMessage::ack`], so a message can be acknowledged at
/// most once. Dropping a message without acknowledging it leaves it pending
/// and the broker redelivers it once its ack deadline expires.
pub struct InboundMessage {
    pub id: String,
    pub payload: Vec<u8>,
    pub attributes: HashMap<String, String>,
    acker: Box<dyn Acknowledger>,
}

impl InboundMessage {
    pub fn new(
        id: impl Into<String>,
        payload: Vec<u8>,
        attributes: HashMap<String, String>,
        acker: Box<dyn Acknowledger>,
    ) -> Self {
        Self {
            id: id.into(),
            payload,
            attributes,
            acker,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Acknowledge the message so it is not redelivered.
    pub async fn ack(self) -> Result<()> {
        self.acker.ack().await
    }
}

impl fmt::Debug for InboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundMessage")
            .field("id", &self.id)
            .field("payload", &String::from_utf8_lossy(&self.payload))
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

/// Stop control for a source.
///
/// Cloned handles share one underlying token; `stop` is safe to call from
/// another task while a pull is in flight.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once [`StopHandle::stop`] has been called on any clone.
    pub async fn stopped(&self) {
        self.token.cancelled().await
    }
}

/// A pull-based, non-restartable sequence of inbound messages.
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next message.
    ///
    /// Returns `Ok(None)` once the source has been stopped or is exhausted.
    async fn next(&mut self) -> Result<Option<InboundMessage>>;

    fn stop_handle(&self) -> StopHandle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingAck(Arc<AtomicUsize>);

    #[async_trait]
    impl Acknowledger for CountingAck {
        async fn ack(&self) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_ack_invokes_acknowledger() {
        let acks = Arc::new(AtomicUsize::new(0));
        let mut attributes = HashMap::new();
        attributes.insert("device_id".to_string(), "photon-1".to_string());

        let msg = InboundMessage::new(
            "m-1",
            b"tf=72.5".to_vec(),
            attributes,
            Box::new(CountingAck(acks.clone())),
        );
        assert_eq!(msg.attribute("device_id"), Some("photon-1"));
        assert_eq!(msg.attribute("event"), None);

        msg.ack().await.unwrap();
        assert_eq!(acks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_wakes_waiter() {
        let handle = StopHandle::new();
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.stopped().await });

        assert!(!handle.is_stopped());
        handle.stop();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
        assert!(handle.is_stopped());
    }
}
