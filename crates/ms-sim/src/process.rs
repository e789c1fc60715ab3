//! Blocking child-process execution with a wall-clock limit.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long pipe readers may keep draining once the child is gone and the
/// deadline has passed.  Descendants that inherited the pipes can hold them
/// open indefinitely; their output is abandoned after this.
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// What a finished (or killed) child left behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvocationReport {
    /// Exit code; `None` if the process was killed or ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout:    String,
    pub stderr:    String,
    /// The limit expired and the child was killed.
    pub timed_out: bool,
}

impl InvocationReport {
    /// A clean zero exit.
    pub fn success() -> Self {
        Self { exit_code: Some(0), ..Self::default() }
    }

    /// A non-zero exit with the given diagnostic text.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self { exit_code: Some(exit_code), stderr: stderr.into(), ..Self::default() }
    }

    pub fn timeout() -> Self {
        Self { timed_out: true, ..Self::default() }
    }

    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Trimmed stderr, falling back to stdout when stderr is empty.
    pub fn diagnostic(&self) -> &str {
        let err = self.stderr.trim();
        if err.is_empty() { self.stdout.trim() } else { err }
    }
}

/// Run `command` to completion, killing it once `timeout` has elapsed.
///
/// Stdout and stderr are drained on helper threads so a chatty child cannot
/// block on a full pipe.  Spawn errors are returned as `Err`; everything that
/// happens after a successful spawn is described by the report.
///
/// Only the direct child is killed.  A grandchild that keeps the pipes open
/// (a wrapper script's `sleep`, say) does not hold this call past the
/// deadline: its readers are detached and whatever they collected so far is
/// lost.
pub fn run_with_timeout(mut command: Command, timeout: Duration) -> io::Result<InvocationReport> {
    command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = command.spawn()?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break Some(status);
        }
        let now = Instant::now();
        if now >= deadline {
            if let Err(e) = child.kill() {
                log::debug!("kill after timeout failed: {e}");
            }
            child.wait()?;
            break None;
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    };

    let drain_until = deadline.max(Instant::now() + DRAIN_GRACE);
    let collect = |rx: Option<Receiver<String>>| {
        rx.and_then(|rx| rx.recv_timeout(drain_until.saturating_duration_since(Instant::now())).ok())
            .unwrap_or_default()
    };

    Ok(InvocationReport {
        exit_code: status.and_then(|s| s.code()),
        stdout:    collect(stdout),
        stderr:    collect(stderr),
        timed_out: status.is_none(),
    })
}

/// Read `source` to the end on a detached thread.
fn drain<R: Read + Send + 'static>(source: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone when the caller stopped waiting.
        let _ = tx.send(read_lossy(source));
    });
    rx
}

fn read_lossy<R: Read>(mut source: R) -> String {
    let mut buf = Vec::new();
    if let Err(e) = source.read_to_end(&mut buf) {
        log::debug!("reading child output failed: {e}");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
