//! Resolver behavior against a mock Open-Meteo server.

use chrono::NaiveDate;
use citytemp_core::{
    CityId, CityTable, DataSource, OpenMeteoConfig, OpenMeteoSource, ResolveError,
    TemperatureResolver,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 15)
}

fn resolver_for(base_url: &str) -> TemperatureResolver {
    let config = OpenMeteoConfig {
        archive_base_url: base_url.to_string(),
        forecast_base_url: base_url.to_string(),
        timeout_secs: Some(5),
    };
    let source = OpenMeteoSource::new(config).expect("client should build");
    TemperatureResolver::new(CityTable::builtin(), Box::new(source))
}

fn archive_body(samples: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "latitude": 30.2,
        "longitude": 31.5,
        "generationtime_ms": 0.1,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "hourly_units": { "time": "unixtime", "temperature_2m": "°C" },
        "hourly": {
            "time": [1718323200, 1718326800, 1718330400, 1718334000],
            "temperature_2m": samples
        }
    })
}

fn forecast_body(max: f64, min: f64) -> serde_json::Value {
    serde_json::json!({
        "latitude": 29.9,
        "longitude": 30.9,
        "timezone": "Africa/Cairo",
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C"
        },
        "daily": {
            "time": ["2024-06-15"],
            "temperature_2m_max": [max],
            "temperature_2m_min": [min]
        }
    })
}

#[tokio::test]
async fn past_date_queries_archive_with_expected_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("latitude", "30.1933"))
        .and(query_param("longitude", "31.4603"))
        .and(query_param("start_date", "2024-06-14"))
        .and(query_param("end_date", "2024-06-14"))
        .and(query_param("hourly", "temperature_2m"))
        .and(query_param("timeformat", "unixtime"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(archive_body(serde_json::json!([18.2, 19.5, 17.1, 21.0]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let result = resolver
        .resolve_on(CityId::Elobour, date(2024, 6, 14), today())
        .await
        .expect("archive lookup should succeed");

    assert_eq!(result.max_temp, "21.0");
    assert_eq!(result.min_temp, "17.1");
    assert_eq!(result.source, DataSource::Historical);
}

#[tokio::test]
async fn today_queries_forecast_with_auto_timezone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "29.9361"))
        .and(query_param("longitude", "30.9269"))
        .and(query_param("daily", "temperature_2m_max,temperature_2m_min"))
        .and(query_param("start_date", "2024-06-15"))
        .and(query_param("end_date", "2024-06-15"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(30.44, 21.05)))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let result = resolver
        .resolve_on(CityId::October, today(), today())
        .await
        .expect("forecast lookup should succeed");

    assert_eq!(result.max_temp, "30.4");
    assert_eq!(result.min_temp, "21.1");
    assert_eq!(result.source, DataSource::CurrentDay);
}

#[tokio::test]
async fn future_date_is_labelled_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("start_date", "2024-06-18"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(33.0, 22.0)))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let result = resolver
        .resolve_on(CityId::Elobour, date(2024, 6, 18), today())
        .await
        .unwrap();

    assert_eq!(result.source, DataSource::Forecast);
    assert_eq!(result.max_temp, "33.0");
}

#[tokio::test]
async fn empty_archive_reports_no_historical_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_body(serde_json::json!([]))))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver
        .resolve_on(CityId::Elobour, date(2024, 1, 1), today())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "No historical data available");
}

#[tokio::test]
async fn null_archive_samples_are_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(archive_body(serde_json::json!([null, 12.34, null, 8.0]))),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let result = resolver
        .resolve_on(CityId::Elobour, date(2024, 1, 1), today())
        .await
        .unwrap();

    assert_eq!(result.max_temp, "12.3");
    assert_eq!(result.min_temp, "8.0");
}

#[tokio::test]
async fn all_null_archive_counts_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(archive_body(serde_json::json!([null, null]))),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver
        .resolve_on(CityId::Elobour, date(2024, 1, 1), today())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::NoHistoricalData));
}

#[tokio::test]
async fn upstream_error_reason_is_verbatim_on_archive() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error": true, "reason": "X" })),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver
        .resolve_on(CityId::Elobour, date(1900, 1, 1), today())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "X");
}

#[tokio::test]
async fn upstream_error_reason_is_verbatim_on_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": true,
                "reason": "Parameter 'start_date' is out of allowed range"
            })),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver
        .resolve_on(CityId::October, date(2030, 1, 1), today())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::Upstream(_)));
    assert_eq!(err.message(), "Parameter 'start_date' is out of allowed range");
}

#[tokio::test]
async fn error_envelope_with_success_status_still_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": true, "reason": "X" })),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver.resolve_on(CityId::Elobour, today(), today()).await.unwrap_err();

    assert_eq!(err.message(), "X");
}

#[tokio::test]
async fn server_error_without_envelope_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver.resolve_on(CityId::Elobour, today(), today()).await.unwrap_err();

    assert!(
        matches!(err, ResolveError::Status { status: 502, .. }),
        "Expected Status, got: {err:?}"
    );
    assert!(err.message().contains("Bad Gateway"));
}

#[tokio::test]
async fn non_json_body_is_a_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver.resolve_on(CityId::Elobour, today(), today()).await.unwrap_err();

    assert!(matches!(err, ResolveError::Parse(_)), "Expected Parse, got: {err:?}");
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn missing_daily_block_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "latitude": 1.0 })),
        )
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver.resolve_on(CityId::Elobour, today(), today()).await.unwrap_err();

    assert!(matches!(err, ResolveError::MissingField("daily")));
}

#[tokio::test]
async fn empty_daily_arrays_are_missing_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": { "time": [], "temperature_2m_max": [], "temperature_2m_min": [] }
        })))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    let err = resolver.resolve_on(CityId::Elobour, today(), today()).await.unwrap_err();

    assert!(matches!(err, ResolveError::MissingField(_)));
}

#[tokio::test]
async fn connection_refused_is_a_transport_failure() {
    // Nothing listens on port 1.
    let resolver = resolver_for("http://127.0.0.1:1/v1");

    let err = resolver.resolve_on(CityId::Elobour, today(), today()).await.unwrap_err();

    assert!(matches!(err, ResolveError::Transport(_)), "Expected Transport, got: {err:?}");
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn repeated_calls_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(20.0, 10.0)))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server.uri());
    resolver.resolve_on(CityId::Elobour, today(), today()).await.unwrap();
    resolver.resolve_on(CityId::Elobour, today(), today()).await.unwrap();
}
