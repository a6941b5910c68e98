use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use czk_logging::{czk_debug, czk_info, czk_warn};

use crate::decode::decode_text;
use crate::fetch::{ChannelProgressSink, FeedFetcher, FetchSettings, ReqwestFetcher};
use crate::{EngineEvent, FailureKind, FeedText, FetchError, RequestId};

enum EngineCommand {
    Fetch { request_id: RequestId, url: String },
}

/// Handle to the background fetch engine.
///
/// The engine owns a tokio runtime on its own thread. Commands are queued
/// with [`EngineHandle::fetch`]; results arrive on the event receiver
/// returned alongside the handle. Dropping the handle stops the engine.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> io::Result<(Self, mpsc::Receiver<EngineEvent>)> {
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(settings)))
    }

    pub fn with_fetcher(
        fetcher: Arc<dyn FeedFetcher>,
    ) -> io::Result<(Self, mpsc::Receiver<EngineEvent>)> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let worker_events = event_tx.clone();
        thread::Builder::new()
            .name("czk-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let fetcher = fetcher.clone();
                    let event_tx = worker_events.clone();
                    runtime.spawn(async move {
                        handle_command(fetcher.as_ref(), command, event_tx).await;
                    });
                }
                czk_debug!("engine command channel closed");
            })?;

        Ok((Self { cmd_tx, event_tx }, event_rx))
    }

    /// Queue one fetch of `url`. Exactly one `FetchCompleted` follows.
    pub fn fetch(&self, request_id: RequestId, url: impl Into<String>) {
        let command = EngineCommand::Fetch {
            request_id,
            url: url.into(),
        };
        if self.cmd_tx.send(command).is_err() {
            czk_warn!("engine thread is gone; request {} dropped", request_id);
            let _ = self.event_tx.send(EngineEvent::FetchCompleted {
                request_id,
                result: Err(FetchError::new(FailureKind::EngineStopped, String::new())),
            });
        }
    }
}

async fn handle_command(
    fetcher: &dyn FeedFetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Fetch { request_id, url } => {
            czk_info!("Fetching feed request_id={} url={}", request_id, url);
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = fetch_feed_text(fetcher, request_id, &url, &sink).await;
            match &result {
                Ok(feed) => czk_info!(
                    "Feed fetched request_id={} bytes={} encoding={}",
                    request_id,
                    feed.metadata.byte_len,
                    feed.encoding_label
                ),
                Err(err) => czk_warn!("Feed fetch failed request_id={}: {}", request_id, err),
            }
            let _ = event_tx.send(EngineEvent::FetchCompleted { request_id, result });
        }
    }
}

async fn fetch_feed_text(
    fetcher: &dyn FeedFetcher,
    request_id: RequestId,
    url: &str,
    sink: &ChannelProgressSink,
) -> Result<FeedText, FetchError> {
    let output = fetcher.fetch(request_id, url, sink).await?;
    let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref())
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
    Ok(FeedText {
        text: decoded.text,
        encoding_label: decoded.encoding_label,
        metadata: output.metadata,
    })
}
