//! External process execution
use hifitime::Duration;
use log::debug;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use thiserror::Error;

/// Poll period, while waiting on a process with timeout
const POLL_PERIOD: std::time::Duration = std::time::Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to launch \"{0}\": {1}")]
    Launch(String, #[source] std::io::Error),
    #[error("process timed out after {0}")]
    Timeout(Duration),
    #[error("process i/o error")]
    Io(#[from] std::io::Error),
}

/// Captured process output
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessOutput {
    /// Exit code, None when terminated by a signal
    pub exit_code: Option<i32>,
    /// Standard output, as text
    pub stdout: String,
    /// Standard error, as text
    pub stderr: String,
}

impl ProcessOutput {
    /// Returns true if process exited with a null code
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a program to completion, capturing its output.
pub trait ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, ProcessError>;
}

impl<P: ProcessRunner + ?Sized> ProcessRunner for &P {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, ProcessError> {
        (**self).run(program, args, timeout)
    }
}

/// [ProcessRunner] spawning actual processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

fn drain<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> thread::JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn joined(handle: thread::JoinHandle<std::io::Result<Vec<u8>>>) -> std::io::Result<String> {
    let buf = handle
        .join()
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "pipe reader panicked"))??;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Kills and reaps the child, so no zombie is left behind.
fn terminate(child: &mut Child) {
    debug!("killing process {}", child.id());
    let _ = child.kill();
    let _ = child.wait();
}

impl SystemRunner {
    fn wait_with_timeout(
        mut child: Child,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        // pipes are drained concurrently, so a verbose child never blocks
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        // durations beyond what Instant can represent never expire
        let deadline = std::time::Duration::try_from_secs_f64(timeout.to_seconds().max(0.0))
            .ok()
            .and_then(|dt| std::time::Instant::now().checked_add(dt));

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {},
                Err(e) => {
                    terminate(&mut child);
                    return Err(ProcessError::Io(e));
                },
            }
            if let Some(deadline) = deadline {
                if std::time::Instant::now() >= deadline {
                    terminate(&mut child);
                    return Err(ProcessError::Timeout(timeout));
                }
            }
            thread::sleep(POLL_PERIOD);
        };

        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout: joined(stdout)?,
            stderr: joined(stderr)?,
        })
    }
}

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, ProcessError> {
        debug!("{} {}", program, args.join(" "));
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProcessError::Launch(program.to_string(), e))?;
        match timeout {
            Some(timeout) => Self::wait_with_timeout(child, timeout),
            None => {
                let output = child.wait_with_output()?;
                Ok(ProcessOutput {
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            },
        }
    }
}

#[cfg(test)]
#[cfg(unix)]
mod test {
    use super::*;
    use hifitime::Unit;
    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }
    #[test]
    fn capture() {
        for timeout in [None, Some(10.0 * Unit::Second)] {
            let output = SystemRunner
                .run("sh", &sh("echo solution; echo warning >&2; exit 3"), timeout)
                .unwrap();
            assert_eq!(output.exit_code, Some(3));
            assert!(!output.success());
            assert_eq!(output.stdout, "solution\n");
            assert_eq!(output.stderr, "warning\n");
        }
    }
    #[test]
    fn timeout() {
        let t = 200.0 * Unit::Millisecond;
        match SystemRunner.run("sh", &sh("sleep 10"), Some(t)) {
            Err(ProcessError::Timeout(dt)) => assert_eq!(dt, t),
            other => panic!("expecting timeout, got {:?}", other),
        }
    }
    #[test]
    fn termination() {
        let mut child = Command::new("sh")
            .args(["-c", "sleep 10"])
            .spawn()
            .unwrap();
        terminate(&mut child);
        // reaped: exit status is known
        assert!(child.try_wait().unwrap().is_some());
    }
    #[test]
    fn unbounded_timeout() {
        let output = SystemRunner
            .run("sh", &sh("echo done"), Some(Duration::MAX))
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "done\n");
    }
    #[test]
    fn launch_failure() {
        let err = SystemRunner
            .run("this-binary-does-not-exist", &[], None)
            .unwrap_err();
        assert!(matches!(err, ProcessError::Launch(..)));
    }
}
