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

/// Errors raised by a message source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Pub/Sub client error: {0}")]
    Client(String),

    #[error("Topic check failed: {0}")]
    Topic(String),

    #[error("Topic '{0}' does not exist")]
    TopicMissing(String),

    #[error("Subscription setup failed: {0}")]
    Subscription(String),

    #[error("Pull failed: {0}")]
    Pull(String),

    #[error("Acknowledge failed: {0}")]
    Ack(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;
