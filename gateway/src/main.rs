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

mod relay;
mod settings;

use anyhow::{Context, Result};
use log::{error, info};
use relay_source_pubsub::{MessageSource, PubsubSource, StopHandle};

use crate::relay::Relay;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env()?;
    info!("Starting weather relay...");

    // 1. Subscription: the topic must exist, the subscription is created on demand.
    let mut source = PubsubSource::connect(settings.source)
        .await
        .context("Pub/Sub setup failed")?;

    // 2. Uplink: one HTTP client for the lifetime of the process.
    let relay = Relay::new(settings.uplink, settings.policy)
        .context("Could not create Weather Underground client")?;

    // 3. Stop pulling on the first interrupt.
    tokio::spawn(watch_for_shutdown(source.stop_handle()));

    info!("Relay started, waiting for messages");
    let summary = relay.run(&mut source).await;

    info!("Goodbye ({summary})");
    Ok(())
}

async fn watch_for_shutdown(stop: StopHandle) {
    if let Err(e) = shutdown_signal().await {
        error!("Could not listen for shutdown signals: {e}");
        return;
    }
    info!("Shutting down...");
    stop.stop();
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
