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

//! HTTP client that uploads station observations to Weather Underground.

use log::{debug, info, warn};
use reqwest::StatusCode;
use url::Url;

use crate::config::WundergroundConfig;
use crate::mapper::UplinkRequest;

/// Failures below the HTTP status level.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("could not build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Uploads [`UplinkRequest`]s with one GET each.
///
/// Holds a single [`reqwest::Client`]; clones share its connection pool.
#[derive(Debug, Clone)]
pub struct UplinkClient {
    id: String,
    endpoint: Url,
    http: reqwest::Client,
}

impl UplinkClient {
    pub fn new(config: &WundergroundConfig) -> Result<Self, TransportError> {
        let endpoint = Url::parse(&config.endpoint)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TransportError::Client)?;

        Ok(Self {
            id: config.id.clone(),
            endpoint,
            http,
        })
    }

    /// Endpoint with the request's parameters as its query string.
    pub fn request_url(&self, req: &UplinkRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&req.to_query_string()));
        url
    }

    /// Send one upload and return the response status.
    ///
    /// Any HTTP status, including 4xx and 5xx, is returned as `Ok`; only
    /// connection, DNS and timeout failures are errors. The request is not retried.
    pub async fn send(&self, req: &UplinkRequest) -> Result<StatusCode, TransportError> {
        let url = self.request_url(req);
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if let Err(e) = response.bytes().await {
            debug!("[{}] Discarding unreadable response body: {e}", self.id);
        }

        let query = req.to_query_string();
        if status.is_success() {
            info!(
                "[{}] Received response code {} after sending data {query}",
                self.id,
                status.as_u16()
            );
        } else {
            warn!(
                "[{}] Upload rejected with response code {} after sending data {query}",
                self.id,
                status.as_u16()
            );
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::remap;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UPLOAD_PATH: &str = "/weatherstation/updateweatherstation.php";

    fn config_for(server: &MockServer) -> WundergroundConfig {
        WundergroundConfig::builder("wu")
            .endpoint(format!("{}{UPLOAD_PATH}", server.uri()))
            .build()
    }

    #[test]
    fn test_request_url() {
        let config = WundergroundConfig::builder("wu").build();
        let client = UplinkClient::new(&config).unwrap();
        let req = remap(b"tf=72.5&df=61.0&h=70&b=30.1", &config).unwrap();

        assert_eq!(
            client.request_url(&req).as_str(),
            "https://weatherstation.wunderground.com/weatherstation/updateweatherstation.php\
             ?ID=&PASSWORD=&action=updateraw&baromin=30.1&dateutc=now&dewptf=61.0\
             &humidity=70&softwaretype=Particle-Photon&tempf=72.5"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = WundergroundConfig::builder("wu").endpoint("not a url").build();
        assert!(matches!(
            UplinkClient::new(&config),
            Err(TransportError::Endpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(UPLOAD_PATH))
            .and(query_param("tempf", "72.5"))
            .and(query_param("dewptf", "61.0"))
            .and(query_param("humidity", "70"))
            .and(query_param("baromin", "30.1"))
            .and(query_param("dateutc", "now"))
            .and(query_param("softwaretype", "Particle-Photon"))
            .and(query_param("action", "updateraw"))
            .respond_with(ResponseTemplate::new(200).set_body_string("success\n"))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let client = UplinkClient::new(&config).unwrap();
        let req = remap(b"tf=72.5&df=61.0&h=70&b=30.1", &config).unwrap();

        assert_eq!(client.send(&req).await.unwrap(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_send_rejection_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(UPLOAD_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("INVALIDPASSWORDID"))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let client = UplinkClient::new(&config).unwrap();
        let req = remap(b"tf=72.5", &config).unwrap();

        assert_eq!(client.send(&req).await.unwrap(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        // Bind and drop a listener to get a port nothing is listening on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = WundergroundConfig::builder("wu")
            .endpoint(format!("http://127.0.0.1:{port}{UPLOAD_PATH}"))
            .build();
        let client = UplinkClient::new(&config).unwrap();
        let req = remap(b"tf=72.5", &config).unwrap();

        assert!(matches!(
            client.send(&req).await,
            Err(TransportError::Request(_))
        ));
    }
}
