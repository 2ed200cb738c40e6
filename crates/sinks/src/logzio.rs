//! LogzioSink - one marker per event over HTTP

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use contracts::{ContractError, DeliveryContext, EventSink, KubeEvent, LogzioConfig};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::marker::{Marker, MarkerRequest};
use crate::metrics::{outcome_label, SinkMetrics};

/// Marker creation path, appended to `baseApi`
pub const API_ENDPOINT: &str = "/v2/markers/create-markers";

/// Header carrying the API token
pub const TOKEN_HEADER: &str = "X-API-TOKEN";

const VENDOR: &str = "Logz.io";

/// Check the parameters a sink cannot work without
///
/// Reports only the first violation: token before base API.
pub fn validate_config(config: &LogzioConfig) -> Result<(), ContractError> {
    if config.token.is_empty() {
        return Err(ContractError::config_validation(
            "token",
            "logzio token must be set",
        ));
    }
    if config.base_api.is_empty() {
        return Err(ContractError::config_validation(
            "baseApi",
            "logzio listener must be set",
        ));
    }
    Ok(())
}

/// Sink that posts each event as a Logz.io marker
pub struct LogzioSink {
    name: String,
    config: LogzioConfig,
    endpoint: String,
    client: Option<Client>,
    metrics: Arc<SinkMetrics>,
}

impl fmt::Debug for LogzioSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogzioSink")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("debug", &self.config.debug)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl LogzioSink {
    /// Create a new LogzioSink
    ///
    /// Validates the configuration and builds the HTTP client. No request is
    /// made until the first `send`.
    #[instrument(name = "logzio_sink_new", skip(name, config))]
    pub fn new(name: impl Into<String>, config: LogzioConfig) -> Result<Self, ContractError> {
        validate_config(&config)?;
        let name = name.into();

        let client = Client::builder()
            .build()
            .map_err(|e| ContractError::SinkConnection {
                sink_name: name.clone(),
                source: Box::new(e),
            })?;
        let endpoint = format!("{}{}", config.base_api, API_ENDPOINT);

        debug!(sink = %name, endpoint = %endpoint, debug = config.debug, "LogzioSink created");

        Ok(Self {
            name,
            config,
            endpoint,
            client: Some(client),
            metrics: Arc::new(SinkMetrics::new()),
        })
    }

    /// Full marker creation URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Delivery counters
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    fn client(&self) -> Result<&Client, ContractError> {
        self.client.as_ref().ok_or_else(|| ContractError::SinkClosed {
            sink_name: self.name.clone(),
        })
    }

    fn encode(&self, event: &KubeEvent) -> Result<Vec<u8>, ContractError> {
        let to_err = |source| ContractError::Serialization {
            sink_name: self.name.clone(),
            source,
        };
        let marker = Marker::from_event(event).map_err(to_err)?;
        let body = MarkerRequest::single(marker).to_vec().map_err(to_err)?;

        if self.config.debug {
            debug!(
                sink = %self.name,
                body = %String::from_utf8_lossy(&body),
                "Marker request"
            );
        }
        Ok(body)
    }

    async fn post(
        &self,
        client: &Client,
        body: Vec<u8>,
        cx: &DeliveryContext,
        started: Instant,
    ) -> Result<(), ContractError> {
        let mut request = client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(TOKEN_HEADER, &self.config.token)
            .body(body);
        if let Some(remaining) = cx.remaining() {
            request = request.timeout(remaining);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e, started))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, started))?;

        if self.config.debug {
            debug!(sink = %self.name, status = status.as_u16(), body = %text, "Marker response");
        }

        if !status.is_success() {
            return Err(ContractError::RemoteRejection {
                vendor: VENDOR,
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(())
    }

    fn transport_error(&self, e: reqwest::Error, started: Instant) -> ContractError {
        if e.is_timeout() {
            return self.timeout_error(started);
        }
        ContractError::transport(&self.name, e)
    }

    fn timeout_error(&self, started: Instant) -> ContractError {
        ContractError::Timeout {
            sink_name: self.name.clone(),
            waited_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Race `fut` against the caller's deadline and cancellation token
    async fn within<F>(
        &self,
        cx: &DeliveryContext,
        started: Instant,
        fut: F,
    ) -> Result<(), ContractError>
    where
        F: Future<Output = Result<(), ContractError>> + Send,
    {
        let deadline = async {
            match cx.get_deadline() {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = cx.token().cancelled() => Err(ContractError::Cancelled {
                sink_name: self.name.clone(),
            }),
            () = deadline => Err(self.timeout_error(started)),
            result = fut => result,
        }
    }

    async fn deliver(&self, event: &KubeEvent, cx: &DeliveryContext) -> Result<(), ContractError> {
        let client = self.client()?;
        let body = self.encode(event)?;
        let started = Instant::now();
        self.within(cx, started, self.post(client, body, cx, started))
            .await
    }

    fn record(&self, result: &Result<(), ContractError>, started: Instant) {
        self.metrics.record(result);
        observability::record_marker_delivery(&self.name, outcome_label(result));
        observability::record_delivery_latency_ms(
            &self.name,
            started.elapsed().as_secs_f64() * 1000.0,
        );
    }
}

impl EventSink for LogzioSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "logzio_sink_send",
        skip(self, event, cx),
        fields(sink = %self.name, event = %event.display_name())
    )]
    async fn send(&self, event: &KubeEvent, cx: &DeliveryContext) -> Result<(), ContractError> {
        let started = Instant::now();
        let result = self.deliver(event, cx).await;
        self.record(&result, started);

        match &result {
            Ok(()) => debug!(sink = %self.name, "Marker delivered"),
            Err(e) => warn!(sink = %self.name, error = %e, "Marker delivery failed"),
        }
        result
    }

    #[instrument(name = "logzio_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        if self.client.take().is_some() {
            debug!(sink = %self.name, "LogzioSink closed");
        }
        Ok(())
    }
}
