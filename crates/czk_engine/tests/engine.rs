use std::sync::{mpsc, Arc};
use std::time::Duration;

use czk_engine::{
    EngineEvent, EngineHandle, FailureKind, FeedFetcher, FeedText, FetchError, FetchMetadata,
    FetchOutput, FetchSettings, ProgressSink, RequestId,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticFetcher {
    body: Vec<u8>,
    content_type: Option<&'static str>,
}

#[async_trait::async_trait]
impl FeedFetcher for StaticFetcher {
    async fn fetch(
        &self,
        _request_id: RequestId,
        _url: &str,
        _sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError> {
        Ok(FetchOutput {
            bytes: self.body.clone(),
            metadata: FetchMetadata {
                content_type: self.content_type.map(ToOwned::to_owned),
                byte_len: self.body.len() as u64,
            },
        })
    }
}

fn wait_for_completion(
    events: &mpsc::Receiver<EngineEvent>,
) -> (RequestId, Result<FeedText, FetchError>) {
    loop {
        match events.recv_timeout(Duration::from_secs(5)) {
            Ok(EngineEvent::FetchCompleted { request_id, result }) => return (request_id, result),
            Ok(EngineEvent::Progress(_)) => {}
            Err(err) => panic!("engine did not complete in time: {err}"),
        }
    }
}

#[test]
fn engine_decodes_fetched_bytes() {
    let fetcher = StaticFetcher {
        body: b"31 Dec\nheader\n\xc8esko|koruna|1|CZK|1\n".to_vec(),
        content_type: Some("text/plain; charset=windows-1250"),
    };
    let (engine, events) = EngineHandle::with_fetcher(Arc::new(fetcher)).expect("engine");

    engine.fetch(9, "https://rates.example.com/daily.txt");
    let (request_id, result) = wait_for_completion(&events);

    assert_eq!(request_id, 9);
    let feed = result.expect("feed text");
    assert_eq!(feed.text, "31 Dec\nheader\nČesko|koruna|1|CZK|1\n");
    assert_eq!(feed.encoding_label, "windows-1250");
    assert_eq!(feed.metadata.byte_len, 35);
}

#[test]
fn engine_reports_decode_failure() {
    let fetcher = StaticFetcher {
        body: b"\xff\xff\xff".to_vec(),
        content_type: Some("text/plain; charset=utf-8"),
    };
    let (engine, events) = EngineHandle::with_fetcher(Arc::new(fetcher)).expect("engine");

    engine.fetch(1, "https://rates.example.com/daily.txt");
    let (_, result) = wait_for_completion(&events);

    assert_eq!(result.unwrap_err().kind, FailureKind::Decode);
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_fetches_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("31 Dec\nh\nEMU|euro|1|EUR|25.2\n", "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (engine, events) = EngineHandle::new(FetchSettings::default()).expect("engine");
    engine.fetch(3, format!("{}/daily.txt", server.uri()));

    let (request_id, result) = tokio::task::spawn_blocking(move || wait_for_completion(&events))
        .await
        .expect("join");

    assert_eq!(request_id, 3);
    assert_eq!(result.expect("feed").text, "31 Dec\nh\nEMU|euro|1|EUR|25.2\n");
}
