//! Asynchronous incremental line streaming over HTTP.
//!
//! [`fetch_lines`] yields each line of the response body as soon as it arrives
//! on the wire, while [`fetch_all_lines`] downloads the entire body before any
//! line becomes available. Both produce the same ordered sequence for the same
//! body (the split semantics of [`crate::lines`]); the difference is purely
//! when a consumer gets to start. For a large feed the eager variant stalls the
//! consumer for the whole transfer, where the incremental variant overlaps
//! parsing and printing with the download.

use async_stream::try_stream;
use futures::Stream;
use futures_util::stream::TryStreamExt;
use std::pin::Pin;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use crate::errors::FeedError;
use crate::lines::read_all_lines;

/// A pinned, boxed stream of lines or per-line failures.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, FeedError>> + Send>>;

/// Stream the lines of `url` incrementally.
///
/// The HTTP status is checked before the first line is yielded; a non-success
/// response is an error, not an empty stream.
pub async fn fetch_lines(client: &reqwest::Client, url: &str) -> Result<LineStream, FeedError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FeedError::Status {
            code: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let byte_stream = response
        .bytes_stream()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Interrupted, e.to_string()));

    let mut lines_reader = StreamReader::new(byte_stream).lines();

    let line_stream = try_stream! {
        while let Some(line) = lines_reader.next_line().await? {
            yield line;
        }
    };

    Ok(Box::pin(line_stream))
}

/// Download the entire body of `url`, then split it into lines.
///
/// Nothing is available to the caller until the transfer completes.
pub async fn fetch_all_lines(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<String>, FeedError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FeedError::Status {
            code: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    Ok(read_all_lines(&body))
}
