use reqwest::Client;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// HTTP client for generation requests with `timeout_secs` as the whole
/// request deadline.
///
/// Falls back to reqwest's default client (no request deadline) only when the
/// TLS backend cannot be initialised; that fallback is logged.
pub fn build_provider_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!(
                timeout_secs,
                "provider HTTP client build failed, using defaults without request timeout: {err}"
            );
            Client::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn configured_timeout_cuts_off_slow_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let err = build_provider_client(1)
            .get(server.uri())
            .send()
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn fast_responses_complete_within_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let response = build_provider_client(5).get(server.uri()).send().await.unwrap();
        assert_eq!(response.status(), 204);
    }
}
