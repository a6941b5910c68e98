use std::io;
use std::sync::mpsc;
use std::thread;

use chrono::Local;
use czk_core::{Effect, Msg};
use czk_engine::{EngineEvent, EngineHandle, FetchSettings};
use czk_logging::{czk_info, czk_warn};

use super::app::AppEvent;

/// Executes core effects on the engine and feeds engine results back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: FetchSettings, event_tx: mpsc::Sender<AppEvent>) -> io::Result<Self> {
        let (engine, events) = EngineHandle::new(settings)?;
        forward_events(events, event_tx)?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchFeed { request_id, url } => {
                    czk_info!("FetchFeed request_id={} url={}", request_id, url);
                    self.engine.fetch(request_id, url);
                }
            }
        }
    }
}

fn forward_events(
    events: mpsc::Receiver<EngineEvent>,
    event_tx: mpsc::Sender<AppEvent>,
) -> io::Result<()> {
    thread::Builder::new()
        .name("czk-engine-events".to_string())
        .spawn(move || {
            for event in events {
                if event_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::FetchProgress {
            request_id: progress.request_id,
            bytes: progress.bytes,
        },
        EngineEvent::FetchCompleted { request_id, result } => match result {
            Ok(feed) => Msg::FeedFetched {
                request_id,
                text: feed.text,
                fetched_at: Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            },
            Err(err) => {
                czk_warn!("Request {} failed: {}", request_id, err);
                Msg::FeedFailed {
                    request_id,
                    message: err.to_string(),
                }
            }
        },
    }
}
