use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use lv_base::config::OpenerConfig;
use lv_mod_tree::OpenRequest;

/// Opens a file at a line in the user's editor.
pub trait FileOpener {
    fn open(&self, request: &OpenRequest) -> io::Result<()>;
}

/// Runs an external command, detached from the terminal.
pub struct CommandOpener {
    program: String,
    args: Vec<String>,
}

impl CommandOpener {
    pub fn new(config: &OpenerConfig) -> Self {
        Self { program: config.program.clone(), args: config.args.clone() }
    }

    /// Arguments with `{path}` and `{line}` substituted.
    pub fn args_for(&self, request: &OpenRequest) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace("{path}", &request.path).replace("{line}", &request.line.to_string()))
            .collect()
    }

    /// Start the editor and reap it on a background thread once it exits.
    pub fn spawn_detached(&self, request: &OpenRequest) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
        let args = self.args_for(request);
        tracing::info!(program = %self.program, ?args, "opening file");
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let program = self.program.clone();
        Ok(std::thread::spawn(move || {
            let status = child.wait();
            match &status {
                Ok(status) => tracing::debug!(%program, %status, "opener exited"),
                Err(e) => tracing::warn!(%program, error = %e, "opener wait failed"),
            }
            status
        }))
    }
}

impl FileOpener for CommandOpener {
    fn open(&self, request: &OpenRequest) -> io::Result<()> {
        self.spawn_detached(request).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opener(program: &str, args: &[&str]) -> CommandOpener {
        CommandOpener::new(&OpenerConfig {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        })
    }

    #[test]
    fn substitutes_path_and_line() {
        let o = opener("code", &["--goto", "{path}:{line}"]);
        let req = OpenRequest { path: "/ws/a.launch.py".into(), line: 0 };
        assert_eq!(o.args_for(&req), vec!["--goto", "/ws/a.launch.py:0"]);
    }

    #[test]
    fn args_without_placeholders_pass_through() {
        let o = opener("vim", &["-R"]);
        let req = OpenRequest { path: "/x".into(), line: 3 };
        assert_eq!(o.args_for(&req), vec!["-R"]);
    }

    #[test]
    fn missing_program_is_error() {
        let o = opener("/nonexistent/editor", &["{path}"]);
        assert!(o.open(&OpenRequest { path: "/x".into(), line: 0 }).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn opened_process_is_reaped() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("opened.txt");
        let script = format!("printf '%s' \"$1\" > '{}'", out.display());
        let o = opener("sh", &["-c", &script, "sh", "{path}:{line}"]);
        let handle = o.spawn_detached(&OpenRequest { path: "/ws/a.launch.py".into(), line: 0 }).unwrap();
        let status = handle.join().unwrap().unwrap();
        assert!(status.success());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "/ws/a.launch.py:0");
    }
}
