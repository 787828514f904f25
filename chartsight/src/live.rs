//! Polling live updates.
//!
//! A chart whose spec names a data endpoint gets a live session: a spawned
//! task that fetches the endpoint on a fixed interval and forwards each
//! decoded snapshot to the controller as a [`ChartEvent::SnapshotReady`].
//! A failed fetch or decode skips the tick and tries again on the next one;
//! the session never crashes the interval. Dropping the session aborts the
//! task, so unmounting a chart cannot leak a timer.

use std::future::Future;
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use chartsight_common::{Error, Result, SourceRecord, decode_auto};

use crate::event::{ChartEvent, ChartId};

/// Fetches one snapshot of a chart's data source.
pub trait SnapshotFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<SourceRecord>>> + Send;
}

/// HTTP snapshot fetcher.
///
/// Expects the endpoint to serve a JSON (or CBOR) array of records; the
/// payload format is auto-detected.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<SourceRecord>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        decode_auto(&body)
    }
}

/// Stream of snapshot events for one chart, one per successful poll.
pub fn snapshot_stream<F>(
    chart: ChartId,
    url: String,
    interval: Duration,
    fetcher: F,
) -> impl Stream<Item = ChartEvent> + Send
where
    F: SnapshotFetcher,
{
    async_stream::stream! {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // A tokio interval fires immediately; consume the first tick so the
        // first fetch lands one full interval after mount.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match fetcher.fetch(&url).await {
                Ok(records) => {
                    tracing::debug!(chart = %chart, records = records.len(), "Snapshot fetched");
                    yield ChartEvent::SnapshotReady {
                        chart: chart.clone(),
                        records,
                    };
                }
                Err(e) => {
                    tracing::warn!(chart = %chart, error = %e, "Snapshot fetch failed; retrying next tick");
                }
            }
        }
    }
}

/// A running live-update session for one chart.
///
/// Dropping the session aborts the polling task. An in-flight fetch is not
/// cancelled mid-await by unmounting alone; its snapshot event is dropped
/// by the controller once the chart id is no longer registered.
pub struct LiveSession {
    chart: ChartId,
    handle: JoinHandle<()>,
}

impl LiveSession {
    /// Spawn the polling task for a chart.
    pub fn spawn<F>(
        chart: ChartId,
        url: String,
        interval: Duration,
        fetcher: F,
        events: UnboundedSender<ChartEvent>,
    ) -> Self
    where
        F: SnapshotFetcher,
    {
        let stream_chart = chart.clone();
        let handle = tokio::spawn(async move {
            let stream = snapshot_stream(stream_chart, url, interval, fetcher);
            futures::pin_mut!(stream);
            while let Some(event) = stream.next().await {
                if events.send(event).is_err() {
                    break;
                }
            }
        });

        Self { chart, handle }
    }

    /// Stop polling.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        tracing::debug!(chart = %self.chart, "Stopping live updates");
        self.handle.abort();
    }
}

/// Slide a time domain forward, preserving its width.
///
/// The new window is `[now - (span - buffer), now + buffer]`: the right
/// edge sits one buffer past "now", the left edge keeps the original span.
pub fn slide_domain(current: (i64, i64), now: i64, buffer: i64) -> (i64, i64) {
    let (from, to) = current;
    let span = to - from;
    (now - (span - buffer), now + buffer)
}

/// Read a `[from, to]` pair out of a domain signal value.
pub fn domain_bounds(value: &serde_json::Value) -> Option<(i64, i64)> {
    let bounds = value.as_array()?;
    if bounds.len() != 2 {
        return None;
    }
    let from = bounds[0].as_f64()? as i64;
    let to = bounds[1].as_f64()? as i64;
    Some((from, to))
}
