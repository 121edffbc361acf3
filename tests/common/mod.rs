use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "HELPDESK_URL",
    "HELPDESK_NONCE",
    "HELPDESK_USERNAME",
    "HELPDESK_APP_PASSWORD",
    "HELPDESK_LOG",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "ALL_PROXY",
    "http_proxy",
    "https_proxy",
    "all_proxy",
];

/// Helper struct to run helpdesk commands in an isolated temp directory
pub struct HelpdeskTest {
    pub temp_dir: TempDir,
    binary_path: String,
}

impl HelpdeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        HelpdeskTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_helpdesk").to_string(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.binary_path);
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .stdin(Stdio::null());
        for var in ENV_VARS {
            command.env_remove(var);
        }
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute helpdesk command")
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut command = self.command(args);
        for (key, value) in env {
            command.env(key, value);
        }
        command.output().expect("Failed to execute helpdesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".helpdesk");
        fs::create_dir_all(&dir).expect("Failed to create .helpdesk directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        let path = self.temp_dir.path().join(".helpdesk").join("config.yaml");
        fs::read_to_string(path).expect("Failed to read config file")
    }
}

/// Build a raw HTTP/1.1 response that closes the connection
pub fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut response = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        response.push_str(&format!("{name}: {value}\r\n"));
    }
    response.push_str(&format!(
        "content-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    ));
    response
}

/// Local HTTP host that answers one connection per scripted response, in order
pub struct MockHost {
    pub url: String,
    listener: TcpListener,
    handle: JoinHandle<Vec<String>>,
}

impl MockHost {
    pub fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock host");
        listener
            .set_nonblocking(true)
            .expect("Failed to configure mock host");
        let url = format!(
            "http://{}/wp-json/",
            listener.local_addr().expect("mock host address")
        );
        let server = listener.try_clone().expect("Failed to clone listener");

        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for response in responses {
                let Some(mut stream) = accept_within(&server, Duration::from_secs(10)) else {
                    break;
                };
                requests.push(read_request(&mut stream));
                stream
                    .write_all(response.as_bytes())
                    .expect("Failed to write response");
            }
            requests
        });

        MockHost {
            url,
            listener,
            handle,
        }
    }

    /// Requests served so far; panics if any further connection is pending
    pub fn finish(self) -> Vec<String> {
        let requests = self.handle.join().expect("mock host thread panicked");
        assert!(
            self.listener.accept().is_err(),
            "unexpected extra request to mock host"
        );
        requests
    }
}

fn accept_within(listener: &TcpListener, timeout: Duration) -> Option<TcpStream> {
    let deadline = Instant::now() + timeout;
    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                stream.set_nonblocking(false).ok()?;
                return Some(stream);
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock && Instant::now() < deadline => {
                thread::sleep(Duration::from_millis(10));
            }
            Err(_) => return None,
        }
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("Failed to set read timeout");
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut buf).expect("Failed to read request");
        if n == 0 {
            return String::from_utf8_lossy(&data).to_string();
        }
        data.extend_from_slice(&buf[..n]);
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).expect("Failed to read request body");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    String::from_utf8_lossy(&data).to_string()
}
