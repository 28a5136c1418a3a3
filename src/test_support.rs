use std::{
    io::{BufRead, BufReader, Read, Write},
    net::TcpListener,
    sync::{Mutex, MutexGuard},
    thread::{self, JoinHandle},
};

use crate::domain::user::UserProfile;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn sample_user() -> UserProfile {
    UserProfile {
        sub: "1090".to_owned(),
        name: Some("Ada Lovelace".to_owned()),
        email: Some("ada@example.com".to_owned()),
        family_name: Some("Lovelace".to_owned()),
        picture: None,
        extra: Default::default(),
    }
}

/// Answers exactly one HTTP request with `status` and a JSON `body`.
///
/// Returns the server's base url and a handle yielding the raw request
/// (request line, headers and body).
pub fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let address = listener.local_addr().expect("listener address");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept test connection");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request = String::new();
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read request line");
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
            request.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }

        let mut payload = vec![0; content_length];
        reader.read_exact(&mut payload).expect("read request body");
        request.push_str(&String::from_utf8_lossy(&payload));

        stream
            .write_all(response.as_bytes())
            .expect("write test response");
        request
    });

    (format!("http://{address}"), handle)
}

/// Base url of a port that refuses connections.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let address = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{address}")
}
