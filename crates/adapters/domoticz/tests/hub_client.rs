//! Hub client against a loopback HTTP responder.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use vsure_adapter_domoticz::{DomoticzClient, DomoticzConfig, HubResponse, HubTimezone};
use vsure_app::ports::{HubGateway, LastUpdate};
use vsure_domain::command::{HubCommand, SwitchCommand};
use vsure_domain::error::VsureError;
use vsure_domain::sensor_index::SensorIndex;

/// Answers every request with `body` (HTTP 200 unless told otherwise) and
/// records the request line and headers it received.
struct Responder {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Responder {
    async fn start(body: &'static str) -> Self {
        Self::start_with_status("200 OK", body).await
    }

    async fn start_with_status(status: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buffer = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buffer.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                    }
                }
                seen.lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&buffer).into_owned());

                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { port, requests }
    }

    fn config(&self) -> DomoticzConfig {
        DomoticzConfig {
            host: "127.0.0.1".to_string(),
            port: self.port,
            ..DomoticzConfig::default()
        }
    }

    fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|raw| raw.lines().next().unwrap_or_default().to_string())
            .collect()
    }
}

fn utc_client(config: &DomoticzConfig) -> DomoticzClient {
    DomoticzClient::new(config, "UTC".parse::<HubTimezone>().unwrap()).unwrap()
}

#[tokio::test]
async fn should_read_last_update_of_device() {
    let hub = Responder::start(
        r#"{"status":"OK","result":[{"idx":"7","Name":"Living","LastUpdate":"2024-01-01 10:00:00"}]}"#,
    )
    .await;
    let client = utc_client(&hub.config());

    let last = client.last_update(&SensorIndex::new("7")).await.unwrap();

    assert_eq!(
        last,
        LastUpdate::At(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap())
    );
    assert_eq!(
        hub.request_lines(),
        ["GET /json.htm?type=devices&rid=7 HTTP/1.1"]
    );
}

#[tokio::test]
async fn should_report_unknown_device_as_not_found() {
    let hub = Responder::start(r#"{"status":"OK","title":"Devices"}"#).await;
    let client = utc_client(&hub.config());

    let last = client.last_update(&SensorIndex::new("99")).await.unwrap();

    assert_eq!(last, LastUpdate::NotFound);
}

#[tokio::test]
async fn should_send_exact_set_level_request() {
    let hub = Responder::start(r#"{"status":"OK","title":"SwitchLight"}"#).await;
    let client = utc_client(&hub.config());

    client
        .send_command(&HubCommand::SetLevel {
            idx: SensorIndex::new("13"),
            level: 10,
        })
        .await
        .unwrap();

    assert_eq!(
        hub.request_lines(),
        ["GET /json.htm?type=command&param=switchlight&idx=13&switchcmd=Set%20Level&level=10 HTTP/1.1"]
    );
}

#[tokio::test]
async fn should_send_switch_and_update_requests() {
    let hub = Responder::start(r#"{"status":"OK"}"#).await;
    let client = utc_client(&hub.config());

    client
        .send_command(&HubCommand::Switch {
            idx: SensorIndex::new("3"),
            command: SwitchCommand::Off,
        })
        .await
        .unwrap();
    client
        .send_command(&HubCommand::UpdateValue {
            idx: SensorIndex::new("12"),
            svalue: "4".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(
        hub.request_lines(),
        [
            "GET /json.htm?type=command&param=switchlight&idx=3&switchcmd=Off HTTP/1.1",
            "GET /json.htm?type=command&param=udevice&idx=12&nvalue=0&svalue=4 HTTP/1.1",
        ]
    );
}

#[tokio::test]
async fn should_map_rejected_command_to_hub_query_error() {
    let hub = Responder::start(r#"{"status":"ERR"}"#).await;
    let client = utc_client(&hub.config());

    let err = client
        .send_command(&HubCommand::UpdateValue {
            idx: SensorIndex::new("12"),
            svalue: "4".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, VsureError::HubQuery(_)));
}

#[tokio::test]
async fn should_send_basic_auth_when_configured() {
    let hub = Responder::start(r#"{"status":"OK"}"#).await;
    let config = DomoticzConfig {
        username: Some("admin".to_string()),
        password: Some("secret".to_string()),
        ..hub.config()
    };
    let client = utc_client(&config);

    let response = client.execute("type=devices&rid=1").await.unwrap();

    assert_eq!(response, HubResponse::Empty);
    let raw = hub.requests.lock().unwrap()[0].to_lowercase();
    // base64("admin:secret")
    assert!(raw.contains("authorization: basic ywrtaw46c2vjcmv0"));
}

#[tokio::test]
async fn should_map_closed_port_to_unreachable_hub() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = DomoticzConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..DomoticzConfig::default()
    };
    let client = utc_client(&config);

    let err = client.last_update(&SensorIndex::new("7")).await.unwrap_err();

    assert!(matches!(err, VsureError::HubUnreachable(_)));
    assert!(err.is_fatal_for_pass());
}

#[tokio::test]
async fn should_treat_http_error_page_as_unreachable_hub() {
    let hub = Responder::start_with_status("401 Unauthorized", "<html>401 Unauthorized</html>").await;
    let client = utc_client(&hub.config());

    let err = client.last_update(&SensorIndex::new("7")).await.unwrap_err();

    assert!(matches!(err, VsureError::HubUnreachable(_)));
    assert!(err.is_fatal_for_pass());
}

#[tokio::test]
async fn should_honour_envelope_sent_with_http_error_status() {
    let hub = Responder::start_with_status("500 Internal Server Error", r#"{"status":"ERR"}"#).await;
    let client = utc_client(&hub.config());

    let err = client.last_update(&SensorIndex::new("7")).await.unwrap_err();

    assert!(matches!(err, VsureError::HubQuery(_)));
}
