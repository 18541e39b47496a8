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

//! Google Cloud Pub/Sub source for the weather relay.
//!
//! Pulls messages from a subscription and hands them out one at a time as
//! [`InboundMessage`]s. Each message carries its own acknowledgment handle.
//!
//! # Example
//!
//! ```ignore
//! use relay_source_pubsub::{MessageSource, PubsubSource, PubsubSourceConfig};
//!
//! let config = PubsubSourceConfig::builder("pubsub-src", "my-project", "weather", "wundergroundPusher")
//!     .credentials_file("service-account.json")
//!     .build();
//!
//! let mut source = PubsubSource::connect(config).await?;
//! while let Some(msg) = source.next().await? {
//!     msg.ack().await?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod source;

pub use config::{PubsubSourceConfig, PubsubSourceConfigBuilder};
pub use error::SourceError;
pub use message::{Acknowledger, InboundMessage, MessageSource, StopHandle};
pub use source::PubsubSource;
