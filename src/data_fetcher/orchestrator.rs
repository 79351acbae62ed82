//! Concurrent fan-out/fan-in execution of fetch descriptors.
//!
//! Every descriptor in a batch is dispatched at once over the shared client and
//! polled on the calling task. The batch resolves when all requests have
//! completed, or fails as soon as one of them does.

use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, instrument};

use super::descriptor::{FetchDescriptor, RawResponse};
use crate::error::AppError;

/// Executes all descriptors concurrently and returns the responses in the
/// order of `descriptors`.
///
/// A single attempt is made per descriptor. The first non-success status or
/// connection failure aborts the whole batch; responses that already arrived
/// are discarded.
#[instrument(skip(client, descriptors), fields(requests = descriptors.len()))]
pub async fn execute(
    client: &Client,
    descriptors: &[FetchDescriptor],
) -> Result<Vec<RawResponse>, AppError> {
    info!("Dispatching {} request(s)", descriptors.len());

    let responses = try_join_all(descriptors.iter().map(|d| fetch_one(client, d))).await?;

    debug!("All {} request(s) completed", responses.len());
    Ok(responses)
}

/// Fixed-size variant of [`execute`] so callers can destructure positionally.
pub async fn execute_array<const N: usize>(
    client: &Client,
    descriptors: [FetchDescriptor; N],
) -> Result<[RawResponse; N], AppError> {
    let responses = execute(client, &descriptors).await?;
    let count = responses.len();
    responses.try_into().map_err(|_| {
        AppError::api_unexpected_structure(
            format!("expected {N} responses, got {count}"),
            "batch",
        )
    })
}

async fn fetch_one(client: &Client, descriptor: &FetchDescriptor) -> Result<RawResponse, AppError> {
    let display_url = descriptor.display_url();
    debug!("Fetching {display_url}");

    let mut request = client.request(descriptor.method.into(), &descriptor.url);
    if !descriptor.params.is_empty() {
        request = request.query(&descriptor.params);
    }
    for (name, value) in &descriptor.headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request.send().await.map_err(|e| {
        error!("Request failed for URL {}: {}", display_url, e);
        if e.is_timeout() {
            AppError::network_timeout(&display_url)
        } else if e.is_connect() {
            AppError::network_connection(&display_url, e.to_string())
        } else {
            AppError::ApiFetch(e)
        }
    })?;

    let status = response.status();
    debug!("Response status: {status} ({display_url})");

    if !status.is_success() {
        error!(
            "HTTP {} - {} (URL: {})",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error"),
            display_url
        );
        return Err(status_error(status, &display_url));
    }

    let body = response.text().await.map_err(|e| {
        error!("Failed to read response body from URL {}: {}", display_url, e);
        AppError::ApiFetch(e)
    })?;
    debug!("Response length: {} bytes", body.len());

    Ok(RawResponse::new(display_url, status.as_u16(), body))
}

/// Maps a non-success status to the matching transport error.
pub(crate) fn status_error(status: StatusCode, url: &str) -> AppError {
    let status_code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown error");

    match status_code {
        404 => AppError::api_not_found(url),
        429 => AppError::api_rate_limit(reason, url),
        400..=499 => AppError::api_client_error(status_code, reason, url),
        502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
        _ => AppError::api_server_error(status_code, reason, url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::http_client::create_test_http_client;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    #[tokio::test]
    async fn test_execute_preserves_request_order() {
        let mock_server = MockServer::start().await;
        // The first request is the slowest, so completion order differs from request order
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fast"))
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let descriptors = vec![
            FetchDescriptor::get(format!("{}/slow", mock_server.uri())),
            FetchDescriptor::get(format!("{}/fast", mock_server.uri())),
        ];

        let responses = execute(&client, &descriptors).await.unwrap();

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].body, "slow");
        assert_eq!(responses[1].body, "fast");
        assert_eq!(responses[0].status, 200);
    }

    #[tokio::test]
    async fn test_execute_sends_params_and_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(query_param("id", "9825"))
            .and(header("x-source", "fotmob"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let descriptor = FetchDescriptor::get(format!("{}/teams", mock_server.uri()))
            .with_param("id", "9825")
            .with_header("x-source", "fotmob");

        let [response] = execute_array(&client, [descriptor]).await.unwrap();
        assert_eq!(response.body, "ok");
        assert!(response.url.ends_with("/teams?id=9825"));
    }

    #[tokio::test]
    async fn test_execute_fails_whole_batch_on_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let descriptors = vec![
            FetchDescriptor::get(format!("{}/ok", mock_server.uri())),
            FetchDescriptor::get(format!("{}/missing", mock_server.uri())),
        ];

        let result = execute(&client, &descriptors).await;

        match result {
            Err(AppError::ApiNotFound { url }) => assert!(url.ends_with("/missing")),
            other => panic!("expected ApiNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_maps_server_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let descriptors = vec![FetchDescriptor::get(format!("{}/busy", mock_server.uri()))];

        let err = execute(&client, &descriptors).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::ApiServiceUnavailable { status: 503, .. }
        ));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_execute_is_idempotent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/league"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":47}"#))
            .mount(&mock_server)
            .await;

        let client = create_test_http_client();
        let descriptors = vec![FetchDescriptor::get(format!("{}/league", mock_server.uri()))];

        let first = execute(&client, &descriptors).await.unwrap();
        let second = execute(&client, &descriptors).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_execute_empty_batch() {
        let client = create_test_http_client();
        let responses = execute(&client, &[]).await.unwrap();
        assert!(responses.is_empty());
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "u"),
            AppError::ApiNotFound { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "u"),
            AppError::ApiRateLimit { .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "u"),
            AppError::ApiClientError { status: 403, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "u"),
            AppError::ApiServiceUnavailable { status: 502, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "u"),
            AppError::ApiServerError { status: 500, .. }
        ));
    }
}
