use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("table request rejected: {0}")]
    Rejected(String),

    #[error("incomplete response")]
    IncompleteResponse,
}

#[derive(Deserialize)]
struct TableResponse {
    code: String,
    message: Option<String>,

    /// Directed distances in meters; `null` marks an unreachable pair.
    distances: Option<Vec<Vec<Option<f64>>>>,
}

pub struct OsrmTableClientParams {
    pub osrm_url: String,
    pub request_timeout: Duration,
}

impl Default for OsrmTableClientParams {
    fn default() -> Self {
        Self {
            osrm_url: OSRM_PUBLIC_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub const OSRM_PUBLIC_API_URL: &str = "https://router.project-osrm.org";
pub const OSRM_TABLE_API_PATH: &str = "/table/v1/driving/";

/// Substituted for pairs the routing engine reports as unreachable, so a
/// matrix never carries an undefined entry.
pub const UNREACHABLE_DISTANCE: f64 = 1.0e9;

pub struct OsrmTableClient {
    params: OsrmTableClientParams,
    client: reqwest::Client,
}

impl OsrmTableClient {
    pub fn new(params: OsrmTableClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    /// Fetches the all-pairs distance table in a single attempt. Any failure
    /// (transport, non-success status, rejected request, wrong shape) is
    /// returned as an error; there is no retry and no partial result.
    pub async fn fetch_table<P>(&self, points: &[P]) -> Result<Vec<Vec<f64>>, OsrmError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.params.osrm_url.clone();
        url.push_str(OSRM_TABLE_API_PATH);

        for (i, point) in points.iter().enumerate() {
            let point: geo_types::Point = point.into();
            url.push_str(&format!("{},{}", point.x(), point.y()));

            if i < points.len() - 1 {
                url.push(';');
            }
        }

        debug!("OsrmTableClient: requesting table for {} points", points.len());

        let response = self
            .client
            .get(url)
            .query(&[("annotations", "distance")])
            .timeout(self.params.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(OsrmError::Api { status, message });
        }

        let table: TableResponse = response.json().await?;

        if table.code != "Ok" {
            return Err(OsrmError::Rejected(
                table.message.unwrap_or(table.code),
            ));
        }

        let distances = table.distances.ok_or(OsrmError::IncompleteResponse)?;

        if distances.len() != points.len()
            || distances.iter().any(|row| row.len() != points.len())
        {
            return Err(OsrmError::IncompleteResponse);
        }

        Ok(distances
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|distance| distance.unwrap_or(UNREACHABLE_DISTANCE))
                    .collect()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use super::*;

    struct Stop {
        lat: f64,
        lng: f64,
    }

    impl From<&Stop> for geo_types::Point {
        fn from(stop: &Stop) -> Self {
            geo_types::Point::new(stop.lng, stop.lat)
        }
    }

    fn stops() -> Vec<Stop> {
        vec![
            Stop { lat: 48.24, lng: -79.0 },
            Stop { lat: 48.25, lng: -79.01 },
        ]
    }

    /// Answers exactly one request with a canned HTTP response, then closes
    /// the connection. Returns the base URL to point the client at.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{addr}")
    }

    fn client_for(osrm_url: String) -> OsrmTableClient {
        OsrmTableClient::new(OsrmTableClientParams {
            osrm_url,
            request_timeout: Duration::from_secs(5),
        })
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let url = serve_once("500 Internal Server Error", "table service down");

        let err = client_for(url).fetch_table(&stops()).await.unwrap_err();

        assert!(matches!(err, OsrmError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn rejected_request_fails_closed_with_the_service_message() {
        let url = serve_once(
            "200 OK",
            r#"{"code":"NoTable","message":"No table found"}"#,
        );

        let err = client_for(url).fetch_table(&stops()).await.unwrap_err();

        match err {
            OsrmError::Rejected(message) => assert_eq!(message, "No table found"),
            other => panic!("expected Rejected, got {other}"),
        }
    }

    #[tokio::test]
    async fn missing_distances_are_an_incomplete_response() {
        let url = serve_once("200 OK", r#"{"code":"Ok"}"#);

        let err = client_for(url).fetch_table(&stops()).await.unwrap_err();

        assert!(matches!(err, OsrmError::IncompleteResponse));
    }

    #[tokio::test]
    async fn non_square_distances_are_an_incomplete_response() {
        let url = serve_once("200 OK", r#"{"code":"Ok","distances":[[0,1.0]]}"#);

        let err = client_for(url).fetch_table(&stops()).await.unwrap_err();

        assert!(matches!(err, OsrmError::IncompleteResponse));
    }

    #[tokio::test]
    async fn null_entries_become_the_unreachable_sentinel() {
        let url = serve_once(
            "200 OK",
            r#"{"code":"Ok","distances":[[0,null],[2540.5,0]]}"#,
        );

        let table = client_for(url).fetch_table(&stops()).await.unwrap();

        assert_eq!(table[0][1], UNREACHABLE_DISTANCE);
        assert_eq!(table[1][0], 2540.5);
        assert_eq!(table[0][0], 0.0);
    }

    #[tokio::test]
    async fn empty_input_yields_an_empty_table_without_a_request() {
        // No server; an empty slice must not build a URL at all.
        let client = client_for("http://127.0.0.1:9".to_string());

        let table = client.fetch_table::<Stop>(&[]).await.unwrap();

        assert!(table.is_empty());
    }
}

