//! # Integration Tests
//!
//! Cross-crate tests against a mock Logz.io endpoint.
//!
//! Covers:
//! - Configuration -> sink construction
//! - Wire format and headers of the marker request
//! - Status classification, deadlines, cancellation
//! - Concurrent delivery through a shared sink

#[cfg(test)]
mod support {
    use chrono::{TimeZone, Utc};
    use contracts::{KubeEvent, LogzioConfig};
    use sinks::LogzioSink;

    pub const TOKEN: &str = "it-token";

    pub fn sink_for(base_api: &str) -> LogzioSink {
        LogzioSink::new(
            "logzio-it",
            LogzioConfig {
                base_api: base_api.to_string(),
                token: TOKEN.to_string(),
                debug: false,
            },
        )
        .unwrap()
    }

    pub fn event(message: &str, unix_secs: i64) -> KubeEvent {
        let mut event = KubeEvent::new(message, Utc.timestamp_opt(unix_secs, 0).unwrap());
        event.metadata.name = format!("evt-{unix_secs}");
        event.metadata.namespace = Some("kube-system".to_string());
        event
    }
}

#[cfg(test)]
mod construction_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContractError, LogzioConfig};
    use sinks::{build_sink, LogzioSink};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_empty_token_fails_without_network() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = LogzioSink::new(
            "logzio",
            LogzioConfig {
                base_api: server.uri(),
                token: String::new(),
                debug: false,
            },
        );
        match result {
            Err(ContractError::ConfigValidation { field, .. }) => assert_eq!(field, "token"),
            other => panic!("expected token validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_base_api_names_listener() {
        let err = LogzioSink::new(
            "logzio",
            LogzioConfig {
                base_api: String::new(),
                token: "present".to_string(),
                debug: false,
            },
        )
        .err()
        .unwrap();

        assert!(err.is_config());
        let message = err.to_string();
        assert!(message.contains("listener must be set"), "got: {message}");
        assert!(!message.contains("token must be set"), "got: {message}");
    }

    #[test]
    fn test_config_file_to_sink() {
        let config = ConfigLoader::load_from_str(
            r#"
[[receivers]]
name = "primary"
[receivers.logzio]
baseApi = "https://api.logz.io"
token = "abc"

[[receivers]]
name = "broken"
[receivers.logzio]
token = "abc"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let primary = build_sink(config.receiver("primary").unwrap()).unwrap();
        assert_eq!(
            primary.endpoint(),
            "https://api.logz.io/v2/markers/create-markers"
        );

        let err = build_sink(config.receiver("broken").unwrap()).unwrap_err();
        assert!(err.to_string().contains("'broken'"));
        assert!(err.to_string().contains("listener must be set"));
    }
}

#[cfg(test)]
mod delivery_tests {
    use std::time::{Duration, Instant};

    use contracts::{ContractError, DeliveryContext, EventSink};
    use serde_json::{json, Value};
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::support::{event, sink_for, TOKEN};

    #[tokio::test]
    async fn test_request_shape_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/markers/create-markers"))
            .and(header("Content-Type", "application/json"))
            .and(header("X-API-TOKEN", TOKEN))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sink = sink_for(&server.uri());
        sink.send(
            &event("Successfully assigned kube-system/coredns", 1_709_294_405),
            &DeliveryContext::new(),
        )
        .await
        .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();

        let markers = body["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 1);
        let marker = &markers[0];
        assert_eq!(marker["title"], "k8s event");
        assert_eq!(marker["tag"], "DEPLOYMENT");
        assert_eq!(marker["timestamp"], json!(1_709_294_405));
        assert_eq!(
            marker["description"],
            "Successfully assigned kube-system/coredns"
        );
        assert_eq!(marker["metadata"]["metadata"]["namespace"], "kube-system");
        assert_eq!(
            marker["metadata"]["message"],
            "Successfully assigned kube-system/coredns"
        );
    }

    #[tokio::test]
    async fn test_any_2xx_is_success() {
        for status in [200u16, 201, 204, 299] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let sink = sink_for(&server.uri());
            let result = sink.send(&event("ok", 1), &DeliveryContext::new()).await;
            assert!(result.is_ok(), "status {status}: {result:?}");
        }
    }

    #[tokio::test]
    async fn test_server_error_surfaces_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let sink = sink_for(&server.uri());
        let err = sink
            .send(&event("x", 1), &DeliveryContext::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("boom"), "got: {err}");
    }

    #[tokio::test]
    async fn test_redirect_status_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(304).set_body_string("not modified"))
            .mount(&server)
            .await;

        let sink = sink_for(&server.uri());
        let err = sink
            .send(&event("x", 1), &DeliveryContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::RemoteRejection { status: 304, .. }));
    }

    #[tokio::test]
    async fn test_empty_message_is_sent_and_remote_decides() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("description must not be empty"),
            )
            .mount(&server)
            .await;

        let sink = sink_for(&server.uri());
        let err = sink
            .send(&event("", 1), &DeliveryContext::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("description must not be empty"));

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["markers"][0]["description"], "");
    }

    #[tokio::test]
    async fn test_deadline_aborts_unresponsive_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(60)))
            .mount(&server)
            .await;

        let sink = sink_for(&server.uri());
        let started = Instant::now();
        let err = sink
            .send(
                &event("slow", 1),
                &DeliveryContext::with_timeout(Duration::from_millis(50)),
            )
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, ContractError::Timeout { .. }), "got: {err}");
        assert!(elapsed >= Duration::from_millis(40), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_already_cancelled_token_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(60)))
            .mount(&server)
            .await;

        let sink = sink_for(&server.uri());
        let token = CancellationToken::new();
        token.cancel();

        let err = sink
            .send(&event("x", 1), &DeliveryContext::new().cancel_token(token))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_failure_does_not_block_next_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .with_priority(2)
            .mount(&server)
            .await;

        let sink = sink_for(&server.uri());
        let cx = DeliveryContext::new();

        let first = sink.send(&event("first", 1), &cx).await;
        let second = sink.send(&event("second", 2), &cx).await;

        assert!(first.unwrap_err().to_string().contains("overloaded"));
        assert!(second.is_ok());

        let snapshot = sink.metrics().snapshot();
        assert_eq!(snapshot.rejected_count, 1);
        assert_eq!(snapshot.delivered_count, 1);
    }

    #[tokio::test]
    async fn test_close_twice() {
        let server = MockServer::start().await;
        let mut sink = sink_for(&server.uri());

        let closed = tokio::time::timeout(Duration::from_secs(1), async {
            sink.close().await?;
            sink.close().await
        })
        .await
        .expect("close hung");

        assert!(closed.is_ok());
        assert!(sink.is_closed());
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{DeliveryContext, EventSink};
    use serde_json::Value;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    use crate::support::{event, sink_for};

    /// Rejects markers whose description ends in an odd digit, echoing the
    /// description back so callers can check attribution.
    struct EchoParity;

    impl Respond for EchoParity {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
            let description = body["markers"][0]["description"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let odd = description
                .chars()
                .last()
                .and_then(|c| c.to_digit(10))
                .is_some_and(|d| d % 2 == 1);

            let status = if odd { 500 } else { 200 };
            ResponseTemplate::new(status)
                .set_body_string(description)
                .set_delay(Duration::from_millis(20))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sends_are_independent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(EchoParity)
            .mount(&server)
            .await;

        let sink = Arc::new(sink_for(&server.uri()));
        let mut handles = Vec::new();
        for i in 0..16i64 {
            let sink = Arc::clone(&sink);
            handles.push(tokio::spawn(async move {
                let message = format!("event-{i}");
                let result = sink
                    .send(&event(&message, 1_700_000_000 + i), &DeliveryContext::new())
                    .await;
                (i, message, result)
            }));
        }

        for handle in handles {
            let (i, message, result) = handle.await.unwrap();
            if i % 2 == 1 {
                let err = result.unwrap_err().to_string();
                assert!(err.ends_with(&message), "event {i} got: {err}");
            } else {
                assert!(result.is_ok(), "event {i}: {result:?}");
            }
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 16);
        for request in requests {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let marker = &body["markers"][0];
            let i: i64 = marker["description"]
                .as_str()
                .unwrap()
                .trim_start_matches("event-")
                .parse()
                .unwrap();
            assert_eq!(marker["timestamp"], 1_700_000_000 + i);
        }

        let snapshot = sink.metrics().snapshot();
        assert_eq!(snapshot.delivered_count, 8);
        assert_eq!(snapshot.rejected_count, 8);
    }
}
