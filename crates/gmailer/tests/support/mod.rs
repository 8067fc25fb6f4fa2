//! In-process fake servers for transport tests
#![allow(dead_code)]

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// One HTTP request as seen by the fake server
#[derive(Debug)]
pub struct HttpRequest {
    pub request_line: String,
    /// Header lines, names lowercased
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Answer a single HTTP request with `status` and a JSON body
///
/// Returns the base URL (`http://127.0.0.1:port`) and a handle resolving to
/// the captured request.
pub async fn serve_json_once(
    status: &'static str,
    body: serde_json::Value,
) -> (String, JoinHandle<HttpRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_http_request(&mut stream).await;

        let body = body.to_string();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        request
    });

    (base, handle)
}

async fn read_http_request(stream: &mut TcpStream) -> HttpRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body was complete");
        buf.extend_from_slice(&chunk[..n]);
    }

    HttpRequest {
        request_line,
        headers,
        body: String::from_utf8_lossy(&buf[body_start..body_start + content_length]).into_owned(),
    }
}

/// What a client did during one SMTP session
#[derive(Debug, Default)]
pub struct SmtpTranscript {
    pub ehlo: Option<String>,
    pub auth: Vec<String>,
    pub mail_from: Option<String>,
    pub rcpt_to: Vec<String>,
    pub data: Option<String>,
    pub quit: bool,
}

/// Plaintext SMTP server that accepts one session
///
/// Advertises `auth_mechanisms` (e.g. `"PLAIN LOGIN"`) in the EHLO reply.
/// `rcpt_reply` is sent in response to every RCPT command, so a 5xx value
/// makes the transaction fail.
pub async fn serve_smtp_once(
    auth_mechanisms: &'static str,
    rcpt_reply: &'static str,
) -> (u16, JoinHandle<SmtpTranscript>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let ehlo_reply = format!("250-localhost\r\n250 AUTH {}\r\n", auth_mechanisms);

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut transcript = SmtpTranscript::default();

        writer
            .write_all(b"220 localhost ESMTP ready\r\n")
            .await
            .unwrap();

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                break;
            }
            let command = line.trim_end().to_string();
            let upper = command.to_ascii_uppercase();

            let reply: &str = if upper.starts_with("EHLO") || upper.starts_with("HELO") {
                transcript.ehlo = Some(command);
                ehlo_reply.as_str()
            } else if upper.starts_with("AUTH") {
                transcript.auth.push(command);
                "235 2.7.0 Authentication successful\r\n"
            } else if upper.starts_with("MAIL FROM:") {
                transcript.mail_from = Some(command["MAIL FROM:".len()..].to_string());
                "250 2.1.0 OK\r\n"
            } else if upper.starts_with("RCPT TO:") {
                transcript.rcpt_to.push(command["RCPT TO:".len()..].to_string());
                rcpt_reply
            } else if upper == "DATA" {
                writer
                    .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                    .await
                    .unwrap();

                let mut data = String::new();
                loop {
                    let mut data_line = String::new();
                    if reader.read_line(&mut data_line).await.unwrap_or(0) == 0
                        || data_line == ".\r\n"
                    {
                        break;
                    }
                    data.push_str(&data_line);
                }
                transcript.data = Some(data);
                "250 2.0.0 OK queued as 42\r\n"
            } else if upper == "QUIT" {
                transcript.quit = true;
                let _ = writer.write_all(b"221 2.0.0 Bye\r\n").await;
                break;
            } else if upper == "RSET" || upper == "NOOP" {
                "250 2.0.0 OK\r\n"
            } else {
                "502 5.5.2 Command not recognized\r\n"
            };

            if writer.write_all(reply.as_bytes()).await.is_err() {
                break;
            }
        }

        transcript
    });

    (port, handle)
}
