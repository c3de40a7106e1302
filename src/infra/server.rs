use std::io::{self, BufRead, BufReader, Read};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use lv_base::config::constants::ANALYZER_PROBE_INTERVAL_MS;

/// A free local TCP port, as reported by the OS.
pub fn find_free_port() -> io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Analyzer child process. Killed on drop.
pub struct AnalyzerServer {
    child: Child,
    port: u16,
}

impl AnalyzerServer {
    /// Start `<program> --port <port>` with its output forwarded to the log.
    pub fn spawn(program: &str, port: u16) -> io::Result<Self> {
        let mut child = Command::new(program)
            .arg("--port")
            .arg(port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        tracing::info!(program, port, pid = child.id(), "analyzer started");

        if let Some(out) = child.stdout.take() {
            forward_lines(out, false);
        }
        if let Some(err) = child.stderr.take() {
            forward_lines(err, true);
        }
        Ok(Self { child, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Poll until the port accepts connections, the process exits, or
    /// `max_wait` elapses. Returns whether the analyzer is reachable.
    pub fn wait_until_ready(&mut self, host: &str, max_wait: Duration) -> bool {
        let deadline = Instant::now() + max_wait;
        loop {
            if port_open(host, self.port) {
                tracing::info!(port = self.port, "analyzer ready");
                return true;
            }
            if let Ok(Some(status)) = self.child.try_wait() {
                tracing::error!(%status, "analyzer exited during startup");
                return false;
            }
            if Instant::now() >= deadline {
                tracing::warn!(port = self.port, waited_ms = max_wait.as_millis() as u64, "analyzer not ready yet");
                return false;
            }
            std::thread::sleep(Duration::from_millis(ANALYZER_PROBE_INTERVAL_MS));
        }
    }
}

impl Drop for AnalyzerServer {
    fn drop(&mut self) {
        tracing::info!(pid = self.child.id(), "stopping analyzer");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn forward_lines<R: Read + Send + 'static>(stream: R, is_stderr: bool) {
    std::thread::spawn(move || {
        for line in BufReader::new(stream).lines().map_while(Result::ok) {
            if is_stderr {
                tracing::warn!(target: "analyzer", "{}", line);
            } else {
                tracing::debug!(target: "analyzer", "{}", line);
            }
        }
    });
}

/// Whether something is listening on `host:port`.
pub fn port_open(host: &str, port: u16) -> bool {
    let Ok(addrs) = (host, port).to_socket_addrs() else { return false };
    addrs.into_iter().any(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(200)).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_port_is_bindable() {
        let port = find_free_port().unwrap();
        assert!(port > 0);
        assert!(TcpListener::bind(("127.0.0.1", port)).is_ok());
    }

    #[test]
    fn port_open_detects_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(port_open("127.0.0.1", port));
        drop(listener);
        assert!(!port_open("127.0.0.1", port));
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        assert!(AnalyzerServer::spawn("/nonexistent/launchviz-analyzer", 1).is_err());
    }
}
