//! Client for the USGS all-month earthquake CSV feed.
//!
//! The feed is a large CSV document regenerated every few minutes; consuming it
//! incrementally matters because the first rows are useful long before the
//! download finishes. [`QuakeFeedClient::stream_records`] parses rows into
//! [`QuakeRecord`]s as they arrive, skipping the header and surfacing malformed
//! rows as per-row errors without ending the stream.

use async_stream::stream;
use chrono::{DateTime, Utc};
use futures::Stream;
use futures_util::StreamExt;
use std::pin::Pin;

use crate::errors::FeedError;
use crate::stream::{fetch_all_lines, fetch_lines, LineStream};

/// The fixed public feed of all earthquakes recorded in the last month.
pub const ALL_MONTH_CSV_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.csv";

// Column positions in the feed header:
// time,latitude,longitude,depth,mag,magType,nst,gap,dmin,rms,net,id,updated,place,...
const COL_TIME: usize = 0;
const COL_LATITUDE: usize = 1;
const COL_LONGITUDE: usize = 2;
const COL_DEPTH: usize = 3;
const COL_MAG: usize = 4;
const COL_ID: usize = 11;
const COL_PLACE: usize = 13;
const MIN_COLUMNS: usize = 14;

/// A pinned, boxed stream of parsed feed rows.
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<QuakeRecord, FeedError>> + Send>>;

/// One row of the earthquake feed, limited to the columns consumers display.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeRecord {
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64,
    /// Blank in the feed for events without an assigned magnitude.
    pub mag: Option<f64>,
    pub id: String,
    pub place: String,
}

impl QuakeRecord {
    /// Parse one non-header CSV row of the feed.
    pub fn parse(line: &str) -> Result<Self, FeedError> {
        let fields = split_csv_fields(line)?;
        if fields.len() < MIN_COLUMNS {
            return Err(FeedError::Parse(format!(
                "Expected at least {} columns, got {}: {}",
                MIN_COLUMNS,
                fields.len(),
                line
            )));
        }

        let time = fields[COL_TIME]
            .parse::<DateTime<Utc>>()
            .map_err(|e| FeedError::Parse(format!("Bad time '{}': {}", fields[COL_TIME], e)))?;

        let mag = if fields[COL_MAG].is_empty() {
            None
        } else {
            Some(parse_float(&fields[COL_MAG], "mag")?)
        };

        Ok(QuakeRecord {
            time,
            latitude: parse_float(&fields[COL_LATITUDE], "latitude")?,
            longitude: parse_float(&fields[COL_LONGITUDE], "longitude")?,
            depth: parse_float(&fields[COL_DEPTH], "depth")?,
            mag,
            id: fields[COL_ID].clone(),
            place: fields[COL_PLACE].clone(),
        })
    }
}

impl std::fmt::Display for QuakeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mag {
            Some(mag) => write!(f, "M {:<4}", mag)?,
            None => write!(f, "M ?   ")?,
        }
        write!(
            f,
            " {}  {}  {}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.place,
            self.id
        )
    }
}

fn parse_float(field: &str, name: &str) -> Result<f64, FeedError> {
    field
        .parse::<f64>()
        .map_err(|e| FeedError::Parse(format!("Bad {} '{}': {}", name, field, e)))
}

/// Split a CSV row into fields, honoring quoted fields.
///
/// The `place` column routinely contains commas ("10 km SSW of Anza, CA") and
/// doubled quotes, so a plain `split(',')` would misalign every later column.
fn split_csv_fields(line: &str) -> Result<Vec<String>, FeedError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        // Doubled quote inside a quoted field is a literal quote.
                        chars.next();
                        current.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => current.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
    }

    if in_quotes {
        return Err(FeedError::Parse(format!("Unterminated quote in row: {}", line)));
    }
    fields.push(current);
    Ok(fields)
}

/// HTTP client for the earthquake feed.
pub struct QuakeFeedClient {
    url: String,
    client: reqwest::Client,
}

impl QuakeFeedClient {
    /// Client for the public all-month feed.
    pub fn new() -> Self {
        Self::with_url(ALL_MONTH_CSV_URL)
    }

    /// Client for an alternate feed location (tests, mirrors).
    pub fn with_url<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw feed lines, incrementally, header included.
    pub async fn stream_lines(&self) -> Result<LineStream, FeedError> {
        fetch_lines(&self.client, &self.url).await
    }

    /// The eager contrast: the whole feed, materialized, header included.
    pub async fn fetch_all_lines(&self) -> Result<Vec<String>, FeedError> {
        fetch_all_lines(&self.client, &self.url).await
    }

    /// Typed records, incrementally. The header row is skipped; a row that
    /// fails to parse yields an error item and the stream continues.
    pub async fn stream_records(&self) -> Result<RecordStream, FeedError> {
        let mut lines = self.stream_lines().await?;

        let records = stream! {
            let mut header_seen = false;
            while let Some(item) = lines.next().await {
                match item {
                    Ok(line) => {
                        if !header_seen {
                            header_seen = true;
                            continue;
                        }
                        if line.is_empty() {
                            continue;
                        }
                        yield QuakeRecord::parse(&line);
                    }
                    Err(e) => yield Err(e),
                }
            }
        };

        Ok(Box::pin(records))
    }
}

impl Default for QuakeFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockFeedServer;

    const HEADER: &str = "time,latitude,longitude,depth,mag,magType,nst,gap,dmin,rms,net,id,updated,place,type,horizontalError,depthError,magError,magNst,status,locationSource,magSource";

    fn sample_row() -> String {
        "2026-08-29T10:01:02.340Z,33.5561667,-116.6796667,14.06,0.94,ml,28,62,0.06621,0.2,ci,ci41199384,2026-08-29T10:04:44.344Z,\"10 km SSW of Anza, CA\",earthquake,0.23,0.49,0.126,21,automatic,ci,ci".to_string()
    }

    #[test]
    fn parses_row_with_quoted_place() {
        let record = QuakeRecord::parse(&sample_row()).unwrap();
        assert_eq!(record.id, "ci41199384");
        assert_eq!(record.place, "10 km SSW of Anza, CA");
        assert_eq!(record.mag, Some(0.94));
        assert_eq!(record.latitude, 33.5561667);
        assert_eq!(record.time.to_rfc3339(), "2026-08-29T10:01:02.340+00:00");
    }

    #[test]
    fn blank_magnitude_is_none() {
        let row = sample_row().replace(",0.94,", ",,");
        let record = QuakeRecord::parse(&row).unwrap();
        assert_eq!(record.mag, None);
    }

    #[test]
    fn doubled_quotes_become_literal_quotes() {
        let fields = split_csv_fields("a,\"say \"\"hi\"\"\",b").unwrap();
        assert_eq!(fields, vec!["a", "say \"hi\"", "b"]);
    }

    #[test]
    fn unterminated_quote_is_a_parse_error() {
        assert!(split_csv_fields("a,\"oops").is_err());
    }

    #[test]
    fn short_row_is_a_parse_error() {
        let err = QuakeRecord::parse("just,three,fields").err().unwrap();
        match err {
            FeedError::Parse(msg) => assert!(msg.contains("columns")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn streams_records_past_a_malformed_row() {
        let body = format!("{}\n{}\nnot,a,valid,row\n{}\n", HEADER, sample_row(), sample_row());
        let server = MockFeedServer::start(&body, "text/csv").await;

        let client = QuakeFeedClient::with_url(server.url());
        let mut records = client.stream_records().await.unwrap();

        let mut ok = 0;
        let mut failed = 0;
        while let Some(item) = records.next().await {
            match item {
                Ok(_) => ok += 1,
                Err(FeedError::Parse(_)) => failed += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }
        assert_eq!((ok, failed), (2, 1));
        server.shutdown().await;
    }

    #[tokio::test]
    async fn header_only_feed_yields_no_records() {
        let server = MockFeedServer::start(&format!("{}\n", HEADER), "text/csv").await;
        let client = QuakeFeedClient::with_url(server.url());
        let mut records = client.stream_records().await.unwrap();
        assert!(records.next().await.is_none());
        server.shutdown().await;
    }
}
