use std::sync::Mutex;
use std::time::Duration;

use feedgrab_core::{MediaItem, MediaKind};
use feedgrab_engine::{
    FailureKind, ProgressObserver, ReqwestTransport, SignIn, Transport, TransportSettings,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingObserver {
    samples: Mutex<Vec<(u64, u64)>>,
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&self, downloaded: u64, total: u64) {
        self.samples.lock().unwrap().push((downloaded, total));
    }
}

fn transport(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(TransportSettings {
        base_url: server.uri(),
        ..TransportSettings::default()
    })
    .expect("client builds")
}

#[tokio::test]
async fn fetches_and_decodes_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/mychan/messages"))
        .and(query_param("limit", "2"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[
                {"id": 9, "text": "latest", "media": {"reference": "m9", "kind": "document",
                  "attributes": [{"type": "file_name", "value": "a.pdf"},
                                 {"type": "mime_type", "value": "application/pdf"}]}},
                {"id": 8, "media": {"reference": "m8", "kind": "sticker"}}
            ]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let messages = transport(&server)
        .with_session("tok-1")
        .fetch_messages("mychan", 2)
        .await
        .expect("messages");

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, 9);
    let media = messages[0].media.as_ref().unwrap();
    assert_eq!(media.kind, MediaKind::Document);
    assert_eq!(media.file_names().collect::<Vec<_>>(), vec!["a.pdf"]);
    assert_eq!(media.mime_type(), Some("application/pdf"));
    assert_eq!(messages[1].text, "");
    assert_eq!(messages[1].media.as_ref().unwrap().kind, MediaKind::Unknown);
}

#[tokio::test]
async fn media_download_reports_progress() {
    let server = MockServer::start().await;
    let body = vec![7u8; 4096];
    Mock::given(method("GET"))
        .and(path("/media/ref-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let observer = RecordingObserver::default();
    let bytes = transport(&server)
        .fetch_media(&MediaItem::photo("ref-1"), &observer)
        .await
        .expect("media");

    assert_eq!(bytes, body);
    let samples = observer.samples.lock().unwrap().clone();
    assert_eq!(samples.last(), Some(&(4096, 4096)));
}

#[tokio::test]
async fn rejected_session_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/c/messages"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = transport(&server).fetch_messages("c", 5).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Unauthorized);
}

#[tokio::test]
async fn server_errors_keep_their_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/gone"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = transport(&server)
        .fetch_media(&MediaItem::video("gone"), &RecordingObserver::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn slow_media_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(TransportSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..TransportSettings::default()
    })
    .unwrap();

    let err = transport
        .fetch_media(&MediaItem::photo("slow"), &RecordingObserver::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn malformed_feed_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels/c/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = transport(&server).fetch_messages("c", 1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn sign_in_flow_returns_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/send_code"))
        .and(body_json(serde_json::json!({ "phone": "+100" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/sign_in"))
        .and(body_json(serde_json::json!({
            "phone": "+100",
            "code": "12345",
            "password": ""
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"session":"abc"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(&server);
    transport.send_code("+100").await.expect("code sent");
    let token = transport
        .sign_in(&SignIn {
            phone: "+100".to_string(),
            code: "12345".to_string(),
            password: String::new(),
        })
        .await
        .expect("signed in");
    assert_eq!(token, "abc");
}
