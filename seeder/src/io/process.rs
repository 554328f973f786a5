//! Child processes with a wall-clock limit and bounded captured output.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

/// Captured output of a finished (or killed) child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Bytes of stdout dropped after `output_limit_bytes` was reached.
    pub stdout_truncated: usize,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.status.success()
    }

    /// Last line of stderr, for error messages.
    pub fn stderr_tail(&self) -> String {
        String::from_utf8_lossy(&self.stderr)
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Run `cmd` with stdin closed, killing it once `timeout` elapses.
///
/// Both pipes are drained on reader threads so a chatty child cannot block on
/// a full pipe. Only the first `output_limit_bytes` of each stream are kept.
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs(), output_limit_bytes))]
pub fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<ProcessOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(program = ?cmd.get_program(), "spawning child process");
    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawn {:?}", cmd.get_program()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_limited(stderr, output_limit_bytes));

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).context("wait for child")? {
        Some(status) => status,
        None => {
            warn!(timeout_secs = timeout.as_secs(), "child timed out, killing");
            timed_out = true;
            child.kill().context("kill child")?;
            child.wait().context("wait child after kill")?
        }
    };

    let (stdout, stdout_truncated) = join_reader(stdout_handle).context("join stdout")?;
    let (stderr, _) = join_reader(stderr_handle).context("join stderr")?;
    if stdout_truncated > 0 {
        warn!(stdout_truncated, "child stdout truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, bytes = stdout.len(), "child finished");
    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        timed_out,
    })
}

fn join_reader(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let keep = n.min(limit.saturating_sub(buf.len()));
        buf.extend_from_slice(&chunk[..keep]);
        truncated += n - keep;
    }

    Ok((buf, truncated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn captures_stdout_of_successful_child() {
        let out = run_with_timeout(sh("printf '<html></html>'"), Duration::from_secs(5), 1024)
            .expect("run");
        assert!(out.succeeded());
        assert_eq!(out.stdout, b"<html></html>");
        assert_eq!(out.stdout_truncated, 0);
    }

    #[test]
    fn truncates_stdout_beyond_limit() {
        let out = run_with_timeout(sh("printf 'abcdef'"), Duration::from_secs(5), 4).expect("run");
        assert_eq!(out.stdout, b"abcd");
        assert_eq!(out.stdout_truncated, 2);
    }

    #[test]
    fn reports_failure_with_stderr_tail() {
        let out = run_with_timeout(
            sh("echo first >&2; echo 'no display' >&2; exit 3"),
            Duration::from_secs(5),
            1024,
        )
        .expect("run");
        assert!(!out.succeeded());
        assert_eq!(out.status.code(), Some(3));
        assert_eq!(out.stderr_tail(), "no display");
    }

    #[test]
    fn kills_child_after_timeout() {
        let out = run_with_timeout(sh("exec sleep 5"), Duration::from_millis(100), 1024).expect("run");
        assert!(out.timed_out);
        assert!(!out.succeeded());
    }

    #[test]
    fn missing_program_is_an_error() {
        let cmd = Command::new("definitely-not-a-browser-binary");
        let err = run_with_timeout(cmd, Duration::from_secs(1), 16).unwrap_err();
        assert!(err.to_string().contains("spawn"));
    }
}
