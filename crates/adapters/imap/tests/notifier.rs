//! Notifier against a scripted plaintext IMAP server.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use vsure_adapter_imap::{EmailConfig, ImapError, ImapNotifier};
use vsure_app::ports::MailboxNotifier;

/// Serves one connection: advertises `capabilities` before and after login,
/// refuses STARTTLS, accepts any login and reports one new message while
/// idling.
async fn start_server(capabilities: &'static str) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (read, mut write) = socket.into_split();
        let mut lines = BufReader::new(read).lines();

        write.write_all(b"* OK test server ready\r\n").await.unwrap();

        let mut idle_tag = None;
        while let Ok(Some(line)) = lines.next_line().await {
            if line == "DONE" {
                if let Some(tag) = idle_tag.take() {
                    let reply = format!("{tag} OK IDLE terminated\r\n");
                    write.write_all(reply.as_bytes()).await.unwrap();
                }
                continue;
            }
            let (tag, command) = line.split_once(' ').unwrap_or((line.as_str(), ""));
            let verb = command
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_uppercase();
            let reply = match verb.as_str() {
                "STARTTLS" => format!("{tag} NO STARTTLS not available\r\n"),
                "LOGIN" => format!("{tag} OK LOGIN completed\r\n"),
                "CAPABILITY" => {
                    format!("* CAPABILITY {capabilities}\r\n{tag} OK CAPABILITY completed\r\n")
                }
                "EXAMINE" => format!(
                    "* 2 EXISTS\r\n* 0 RECENT\r\n* FLAGS (\\Seen)\r\n{tag} OK [READ-ONLY] EXAMINE completed\r\n"
                ),
                "IDLE" => {
                    idle_tag = Some(tag.to_string());
                    "+ idling\r\n* 3 EXISTS\r\n".to_string()
                }
                "LOGOUT" => format!("* BYE\r\n{tag} OK LOGOUT completed\r\n"),
                _ => format!("{tag} BAD unknown command\r\n"),
            };
            if write.write_all(reply.as_bytes()).await.is_err() {
                return;
            }
        }
    });

    port
}

fn config(port: u16) -> EmailConfig {
    EmailConfig {
        host: "127.0.0.1".to_string(),
        port,
        ssl: false,
        folder: "INBOX".to_string(),
        username: "someone".to_string(),
        password: "secret".to_string(),
        ..EmailConfig::default()
    }
}

#[tokio::test]
async fn should_wake_up_when_new_mail_arrives() {
    let port = start_server("IMAP4rev1 IDLE").await;
    let mut notifier = ImapNotifier::connect(&config(port)).await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), notifier.wait_for_change()).await;

    assert!(matches!(result, Ok(Ok(()))));
}

#[tokio::test]
async fn should_refuse_server_without_idle() {
    let port = start_server("IMAP4rev1").await;

    let err = ImapNotifier::connect(&config(port)).await.unwrap_err();

    assert!(matches!(err, ImapError::IdleUnsupported));
}

#[tokio::test]
async fn should_report_refused_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = ImapNotifier::connect(&config(port)).await.unwrap_err();

    assert!(matches!(err, ImapError::Connect { .. }));
}

#[tokio::test]
async fn should_fail_when_offered_starttls_is_refused() {
    let port = start_server("IMAP4rev1 STARTTLS IDLE").await;

    let err = ImapNotifier::connect(&config(port)).await.unwrap_err();

    assert!(matches!(err, ImapError::StartTls(_)));
}
