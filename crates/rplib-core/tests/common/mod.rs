#![allow(dead_code)]

use rplib_assert::openpgp::{TAG_PUBLIC_KEY, TAG_USER_ID};
use rplib_assert::Packet;
use rplib_core::keygen::KEY_ID;
use rplib_core::{KeyGenerator, KeygenError, SerialError, SerialSource};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const MODEL: &str = "type: model
authority-id: my-brand
series: 16
brand-id: my-brand
model: my-gateway
revision: 4
timestamp: 2016-12-18T10:00:00Z

AcLBXAQAAQoABgUCWFZGNAAKCRAHKljtl9kuLm9CD

";

/// Writes a fixed public key into key storage, the way gpg would.
pub struct FakeGpg;

impl KeyGenerator for FakeGpg {
    fn generate(&self, key_dir: &Path) -> Result<Vec<u8>, KeygenError> {
        std::fs::write(key_dir.join("pubring.kbx"), b"keybox")?;
        let mut exported = Packet::new(TAG_PUBLIC_KEY, vec![4, 0x58, 0x56, 0x46, 0x34, 1, 0, 1, 0x80])
            .to_bytes();
        exported.extend(Packet::new(TAG_USER_ID, KEY_ID.as_bytes().to_vec()).to_bytes());
        Ok(exported)
    }
}

pub const FAKE_DEVICE_KEY: &str = "openpgp xgkEWFZGNAEAAYA=";

pub struct FixedSerial(pub &'static str);

impl SerialSource for FixedSerial {
    fn hardware_serial(&self) -> Result<String, SerialError> {
        Ok(self.0.to_string())
    }
}

/// Request as seen by the one-shot server.
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Serves exactly one HTTP request with `response` as a 200 body.
///
/// Returns the server base URL (with trailing slash) and a handle yielding
/// the captured request.
pub fn serve_once(response: Vec<u8>) -> (String, JoinHandle<CapturedRequest>) {
    serve_once_after(Duration::ZERO, response)
}

/// Like [`serve_once`], but waits `delay` after reading the request
/// before answering.
pub fn serve_once_after(
    delay: Duration,
    response: Vec<u8>,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(':').unwrap();
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }

        let len = headers
            .iter()
            .find(|(name, _)| name == "content-length")
            .map(|(_, value)| value.parse::<usize>().unwrap())
            .unwrap_or(0);
        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).unwrap();

        thread::sleep(delay);

        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            response.len()
        )
        .unwrap();
        stream.write_all(&response).unwrap();
        stream.flush().unwrap();

        CapturedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body,
        }
    });

    (format!("http://{addr}/"), handle)
}

/// A base URL nothing listens on.
pub fn closed_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
