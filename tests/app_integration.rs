use coinconv::core::config::{ApiConfig, FiatEnvelope, FormConfig};
use coinconv::core::{ConversionGateway, ConvertorForm, Field, FormState, SubmitOutcome};
use coinconv::providers::HttpGateway;
use std::fs;
use std::sync::Arc;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const FIAT_LIST: &str = r#"{"data": {"data": [
        {"id": 2781, "name": "United States Dollar", "sign": "$", "symbol": "USD"},
        {"id": 2790, "name": "Euro", "sign": "€", "symbol": "EUR"}
    ]}}"#;

    pub const CRYPTO_LIST: &str = r#"{"data": [
        {
            "id": 1, "rank": 1, "name": "Bitcoin", "symbol": "BTC", "slug": "bitcoin",
            "is_active": 1,
            "first_historical_data": "2013-04-28T18:47:21.000Z",
            "last_historical_data": "2024-05-01T10:10:00.000Z",
            "platform": null
        },
        {
            "id": 1027, "rank": 2, "name": "Ethereum", "symbol": "ETH", "slug": "ethereum",
            "is_active": 1,
            "first_historical_data": "2015-08-07T14:49:30.000Z",
            "last_historical_data": "2024-05-01T10:10:00.000Z",
            "platform": null
        }
    ]}"#;

    /// Mock service with both list endpoints and the given convert reply.
    pub async fn create_mock_server(convert_status: u16, convert_body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/fiat/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FIAT_LIST))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/crypto/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CRYPTO_LIST))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/crypto/convert"))
            .respond_with(ResponseTemplate::new(convert_status).set_body_string(convert_body))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

fn gateway_for(uri: &str) -> Arc<dyn ConversionGateway> {
    Arc::new(
        HttpGateway::new(&ApiConfig {
            base_url: uri.to_string(),
            fiat_envelope: FiatEnvelope::Nested,
        })
        .expect("Failed to build gateway"),
    )
}

#[test_log::test(tokio::test)]
async fn test_form_flow_against_mock_service() {
    let mock_server =
        test_utils::create_mock_server(200, r#"{"convertedAmount": 123456.789, "fiat": "EUR"}"#)
            .await;

    let mut form = ConvertorForm::new(gateway_for(&mock_server.uri()), &FormConfig::default());
    form.mount();
    form.wait_for_lists().await;
    assert_eq!(form.fiat_list().len(), 2);
    assert_eq!(form.crypto_list().len(), 2);

    form.set_value(Field::Cryptocurrency, "ETH");
    form.set_value(Field::Amount, "42");
    form.set_value(Field::Currency, "EUR");

    let outcome = form.submit().await;
    info!(?outcome, "Submitted conversion");

    let SubmitOutcome::Converted(result) = outcome else {
        panic!("Expected a conversion, got {outcome:?}");
    };
    assert_eq!(
        coinconv::cli::render::result_line(&result),
        "Your converted amount is 123,456.789 EUR"
    );
    assert_eq!(form.state(), FormState::Idle);
    assert_eq!(form.values().amount, "0");
    assert_eq!(form.values().cryptocurrency, "ETH");
    assert_eq!(form.values().currency, "EUR");

    form.unmount();
}

#[test_log::test(tokio::test)]
async fn test_form_flow_with_unreachable_service() {
    let mut form = ConvertorForm::new(gateway_for("http://127.0.0.1:9"), &FormConfig::default());
    form.mount();
    form.wait_for_lists().await;

    assert!(form.fiat_list().is_empty());
    assert!(form.crypto_list().is_empty());

    form.set_value(Field::Cryptocurrency, "BTC");
    form.set_value(Field::Amount, "1");
    assert!(matches!(form.submit().await, SubmitOutcome::Invalid(_)));
    assert_eq!(form.state(), FormState::Idle);
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server =
        test_utils::create_mock_server(200, r#"{"convertedAmount": 1234.5, "fiat": "USD"}"#).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"
        api:
          base_url: {}
          fiat_envelope: nested
        form:
          min_amount: "0.01"
    "#,
        mock_server.uri()
    );
    fs::write(config_path, &config_content).expect("Failed to write config file");

    let result = coinconv::run_command(
        coinconv::AppCommand::Convert {
            crypto: "BTC".to_string(),
            amount: "0.5".to_string(),
            currency: None,
        },
        coinconv::RunOptions {
            config_path: Some(config_path.to_str().unwrap()),
            base_url: Some(&mock_server.uri()),
        },
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );

    let result = coinconv::run_command(
        coinconv::AppCommand::Lists,
        coinconv::RunOptions {
            config_path: Some(config_path.to_str().unwrap()),
            base_url: Some(&mock_server.uri()),
        },
    )
    .await;
    assert!(result.is_ok(), "Lists failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_rejects_amount_below_minimum() {
    let mock_server =
        test_utils::create_mock_server(200, r#"{"convertedAmount": 1.0, "fiat": "USD"}"#).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "form:\n  min_amount: \"0.01\"\n")
        .expect("Failed to write config file");

    let result = coinconv::run_command(
        coinconv::AppCommand::Convert {
            crypto: "BTC".to_string(),
            amount: "0.01".to_string(),
            currency: Some("USD".to_string()),
        },
        coinconv::RunOptions {
            config_path: Some(config_file.path().to_str().unwrap()),
            base_url: Some(&mock_server.uri()),
        },
    )
    .await;
    assert!(result.is_err());

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(
        requests
            .iter()
            .all(|r| r.url.path() != "/api/crypto/convert"),
        "Conversion must not be requested for an invalid amount"
    );
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_service_error() {
    let mock_server = test_utils::create_mock_server(200, r#"{"error": true}"#).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "{}\n").expect("Failed to write config file");

    let result = coinconv::run_command(
        coinconv::AppCommand::Convert {
            crypto: "BTC".to_string(),
            amount: "1".to_string(),
            currency: Some("EUR".to_string()),
        },
        coinconv::RunOptions {
            config_path: Some(config_file.path().to_str().unwrap()),
            base_url: Some(&mock_server.uri()),
        },
    )
    .await;

    let err = result.expect_err("Service error should fail the command");
    assert_eq!(err.to_string(), "Could not convert BTC to EUR");
}
