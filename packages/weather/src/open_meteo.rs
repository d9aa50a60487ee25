//! Open-Meteo forecast API client.
//!
//! Requests the `current` block for a single coordinate. No API key is
//! required. Requests are not retried.
//!
//! See <https://open-meteo.com/en/docs>

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use ranch_map_geography_models::Coordinate;

use crate::{CurrentConditions, WeatherConfig, WeatherError, WeatherProvider};

/// Soil moisture variable in the `current` block.
pub const SOIL_MOISTURE_VAR: &str = "soil_moisture_0_to_1cm";

/// Air temperature variable in the `current` block.
pub const TEMPERATURE_VAR: &str = "temperature_2m";

/// Timestamp format of `current.time` (local time, no offset).
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const USER_AGENT: &str = concat!("ranch-map/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo client bound to one endpoint and variable set.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    include_temperature: bool,
}

impl OpenMeteoClient {
    /// Builds a client from profile settings.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError`] if the HTTP client cannot be built.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            include_temperature: config.include_temperature,
        })
    }

    /// Comma-separated `current` variables for the request.
    #[must_use]
    pub fn current_variables(&self) -> String {
        if self.include_temperature {
            format!("{TEMPERATURE_VAR},{SOIL_MOISTURE_VAR}")
        } else {
            SOIL_MOISTURE_VAR.to_string()
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current_conditions(
        &self,
        coordinate: Coordinate,
    ) -> Result<CurrentConditions, WeatherError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", coordinate.lat.to_string()),
                ("longitude", coordinate.lon.to_string()),
                ("current", self.current_variables()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let reason = upstream_reason(&text);
            log::warn!("Open-Meteo lookup for {coordinate} failed: {status} {reason}");
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                reason,
            });
        }

        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| WeatherError::Parse {
                message: format!("Open-Meteo response is not JSON: {e}"),
            })?;

        parse_response(&body)
    }
}

/// Error reason from a non-success body: the JSON `reason` field when
/// present, otherwise the raw (trimmed) body.
fn upstream_reason(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|body| body["reason"].as_str().map(ToString::to_string))
        .unwrap_or_else(|| text.trim().to_string())
}

/// Parses the `current` block of an Open-Meteo forecast response.
fn parse_response(body: &serde_json::Value) -> Result<CurrentConditions, WeatherError> {
    let current = body
        .get("current")
        .filter(|c| c.is_object())
        .ok_or_else(|| WeatherError::Parse {
            message: "Open-Meteo response has no current block".to_string(),
        })?;

    let soil_moisture = current[SOIL_MOISTURE_VAR]
        .as_f64()
        .ok_or_else(|| WeatherError::Parse {
            message: format!("Missing {SOIL_MOISTURE_VAR} in Open-Meteo response"),
        })?;

    let temperature = current[TEMPERATURE_VAR].as_f64();

    let observed_at = current["time"]
        .as_str()
        .and_then(|s| NaiveDateTime::parse_from_str(s, TIME_FORMAT).ok());

    Ok(CurrentConditions {
        soil_moisture,
        temperature,
        observed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(include_temperature: bool, base_url: &str) -> OpenMeteoClient {
        OpenMeteoClient::new(&WeatherConfig {
            base_url: base_url.to_string(),
            include_temperature,
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[test]
    fn parses_current_block() {
        let body = serde_json::json!({
            "latitude": 46.8,
            "longitude": -110.3,
            "current": {
                "time": "2026-06-01T14:15",
                "interval": 900,
                "temperature_2m": 21.4,
                "soil_moisture_0_to_1cm": 0.215
            }
        });
        let conditions = parse_response(&body).unwrap();
        assert!((conditions.soil_moisture - 0.215).abs() < 1e-9);
        assert_eq!(conditions.temperature, Some(21.4));
        assert_eq!(
            conditions.observed_at.unwrap().to_string(),
            "2026-06-01 14:15:00"
        );
    }

    #[test]
    fn temperature_is_optional() {
        let body = serde_json::json!({
            "current": { "soil_moisture_0_to_1cm": 0.3 }
        });
        let conditions = parse_response(&body).unwrap();
        assert!(conditions.temperature.is_none());
        assert!(conditions.observed_at.is_none());
    }

    #[test]
    fn missing_soil_moisture_is_an_error() {
        let body = serde_json::json!({
            "current": { "time": "2026-06-01T14:15", "soil_moisture_0_to_1cm": null }
        });
        assert!(matches!(
            parse_response(&body),
            Err(WeatherError::Parse { .. })
        ));
    }

    #[test]
    fn missing_current_block_is_an_error() {
        let body = serde_json::json!({ "latitude": 46.8 });
        assert!(matches!(
            parse_response(&body),
            Err(WeatherError::Parse { .. })
        ));
    }

    #[test]
    fn variable_list_follows_config() {
        let base = "https://api.open-meteo.com/v1/forecast";
        assert_eq!(client(false, base).current_variables(), "soil_moisture_0_to_1cm");
        assert_eq!(
            client(true, base).current_variables(),
            "temperature_2m,soil_moisture_0_to_1cm"
        );
    }

    #[test]
    fn upstream_reason_prefers_json_field() {
        assert_eq!(
            upstream_reason(r#"{"error": true, "reason": "Latitude must be in range"}"#),
            "Latitude must be in range"
        );
        assert_eq!(
            upstream_reason("<html>Bad Gateway</html>\n"),
            "<html>Bad Gateway</html>"
        );
    }

    /// Serves one canned HTTP response on a loopback port and returns the
    /// forecast URL pointing at it.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0_u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/v1/forecast")
    }

    #[tokio::test]
    async fn non_json_error_page_keeps_upstream_status() {
        let url = serve_once("503 Service Unavailable", "<html>Service Unavailable</html>").await;
        let result = client(false, &url)
            .current_conditions(Coordinate::new(46.8, -110.3))
            .await;

        match result {
            Err(WeatherError::Upstream { status, reason }) => {
                assert_eq!(status, 503);
                assert_eq!(reason, "<html>Service Unavailable</html>");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn json_error_reason_is_surfaced() {
        let url = serve_once(
            "400 Bad Request",
            r#"{"error":true,"reason":"Cannot initialize WeatherVariable from invalid String value"}"#,
        )
        .await;
        let result = client(false, &url)
            .current_conditions(Coordinate::new(46.8, -110.3))
            .await;

        assert!(matches!(
            result,
            Err(WeatherError::Upstream { status: 400, ref reason })
                if reason.starts_with("Cannot initialize WeatherVariable")
        ));
    }

    #[tokio::test]
    async fn successful_response_is_parsed() {
        let url = serve_once(
            "200 OK",
            r#"{"current":{"time":"2026-06-01T14:15","soil_moisture_0_to_1cm":0.25}}"#,
        )
        .await;
        let conditions = client(false, &url)
            .current_conditions(Coordinate::new(46.8, -110.3))
            .await
            .unwrap();

        assert!((conditions.soil_moisture - 0.25).abs() < 1e-9);
        assert!(conditions.observed_at.is_some());
    }

    #[tokio::test]
    async fn unreachable_service_is_an_http_error() {
        // Port 9 (discard) is closed on loopback, so the connect fails fast.
        let weather = client(false, "http://127.0.0.1:9/v1/forecast");
        let result = weather
            .current_conditions(Coordinate::new(46.8, -110.3))
            .await;
        assert!(matches!(result, Err(WeatherError::Http(_))));
    }
}
