//! Device client tests against a mocked Coinbox HTTP surface

use coinbox_client::{ClientError, DeviceClient, DiscoveryPoller, SessionEnd};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn device() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let client = DeviceClient::new(server.uri()).unwrap();
    (server, client)
}

#[tokio::test]
async fn ping_detects_a_live_device() {
    let (server, client) = device().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(client.ping().await);
}

#[tokio::test]
async fn ping_is_false_for_an_unreachable_device() {
    // Nothing listens on this address; ping must not error
    let client = DeviceClient::new("http://127.0.0.1:1").unwrap();
    assert!(!client.ping().await);
}

#[tokio::test]
async fn upload_posts_multipart_to_the_slot_path() {
    let (server, client) = device().await;

    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.enter_config().await.unwrap();
    session
        .upload_sample(0, b"RIFF....WAVE".to_vec())
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_surfaces_device_errors_with_status() {
    let (server, client) = device().await;

    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1"))
        .respond_with(ResponseTemplate::new(507).set_body_string("flash full"))
        .mount(&server)
        .await;

    let session = client.enter_config().await.unwrap();
    let err = session.upload_sample(1, vec![0; 16]).await.unwrap_err();

    match err {
        ClientError::DeviceError { status, message } => {
            assert_eq!(status, 507);
            assert_eq!(message, "flash full");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn out_of_range_slot_is_rejected_locally() {
    let (server, client) = device().await;

    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let session = client.enter_config().await.unwrap();
    let err = session.upload_sample(3, vec![0; 16]).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidSlot(3)));
}

#[tokio::test]
async fn factory_reset_hits_the_reset_endpoint() {
    let (server, client) = device().await;

    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reset"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.enter_config().await.unwrap();
    session.factory_reset().await.unwrap();
}

#[tokio::test]
async fn finish_reports_a_confirmed_exit() {
    let (server, client) = device().await;

    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/restart"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.enter_config().await.unwrap();
    let end = session.finish().await;
    assert!(end.exited());
}

#[tokio::test]
async fn finish_reports_a_failed_restart() {
    let (server, client) = device().await;

    Mock::given(method("GET"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/restart"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = client.enter_config().await.unwrap();
    let end = session.finish().await;
    assert!(!end.exited());
    assert!(matches!(end, SessionEnd::RestartFailed(_)));
}

#[tokio::test]
async fn discovery_poller_finds_the_device() {
    let (server, client) = device().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut poller = DiscoveryPoller::spawn(client, Duration::from_millis(20));
    tokio::time::timeout(Duration::from_secs(2), poller.wait_until_found())
        .await
        .expect("device should be discovered within the timeout");
    assert_eq!(poller.latest(), Some(true));
    poller.cancel();
}
