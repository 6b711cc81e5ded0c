// Simulation process pipe
// Spawns the runner in trace mode and drains its stdout on a dedicated
// thread. Lines are handed over an mpsc channel, so the child never blocks
// on a full pipe and the consumer blocks only when it asks to.

use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use thiserror::Error;

use crate::config::RunnerConfig;
use crate::trace::protocol;

/// Lines of buffered output quoted back in fatal errors
const ERROR_TAIL_LINES: usize = 8;

#[derive(Error, Debug)]
pub enum PipeError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` ended without emitting the phase sentinel; last output:\n{tail}")]
    ProtocolTimeout { command: String, tail: String },
    #[error("`{command}` failed ({status}); last output:\n{tail}")]
    Process {
        command: String,
        status: ExitStatus,
        tail: String,
    },
    #[error("pipe i/o failed for `{command}`: {source}")]
    Stream {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// A running traced simulation. Lines arrive exactly once, in emission
/// order; completed segments are handed out as owned text, never by
/// reference into an internal buffer.
pub struct TracePipe {
    child: Child,
    lines: Receiver<io::Result<String>>,

    /// Rendered command line, for log and error context
    command: String,

    /// Text drained after the phase boundary
    remaining: String,
}

impl TracePipe {
    /// Spawn the configured runner with piped stdout and start the drain
    /// thread
    pub fn start(config: &RunnerConfig) -> Result<TracePipe, PipeError> {
        Self::start_argv(&config.runner, &config.runner_args())
    }

    fn start_argv(program: &str, args: &[String]) -> Result<TracePipe, PipeError> {
        let mut command_text = program.to_string();
        for arg in args {
            command_text.push(' ');
            command_text.push_str(arg);
        }
        log::info!("starting simulation: {}", command_text);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| PipeError::Spawn {
                command: command_text.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| PipeError::Spawn {
            command: command_text.clone(),
            source: io::Error::other("child stdout was not captured"),
        })?;

        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
            log::debug!("drain thread finished");
        });

        Ok(TracePipe {
            child,
            lines,
            command: command_text,
            remaining: String::new(),
        })
    }

    /// Block until the phase sentinel arrives and return all text up to and
    /// including it. A stream that ends first is an error: the child failing
    /// is a `Process` error, the child succeeding without ever emitting the
    /// sentinel is a `ProtocolTimeout`.
    pub fn await_phase_boundary(&mut self) -> Result<String, PipeError> {
        let mut text = String::new();
        loop {
            match self.lines.recv() {
                Ok(Ok(line)) => {
                    let boundary = protocol::is_sentinel(&line);
                    text.push_str(&line);
                    text.push('\n');
                    if boundary {
                        log::debug!("phase boundary after {} bytes", text.len());
                        return Ok(text);
                    }
                }
                Ok(Err(source)) => return Err(self.stream_error(source)),
                Err(_) => {
                    let status = self.wait_status()?;
                    return Err(if status.success() {
                        PipeError::ProtocolTimeout {
                            command: self.command.clone(),
                            tail: tail_of(&text),
                        }
                    } else {
                        PipeError::Process {
                            command: self.command.clone(),
                            status,
                            tail: tail_of(&text),
                        }
                    });
                }
            }
        }
    }

    /// Drain the stream to its end, then reap the child. Nonzero exit
    /// surfaces as a `Process` error; the drained text stays buffered for
    /// `drain_remaining`.
    pub fn await_completion(&mut self) -> Result<(), PipeError> {
        loop {
            match self.lines.recv() {
                Ok(Ok(line)) => {
                    self.remaining.push_str(&line);
                    self.remaining.push('\n');
                }
                Ok(Err(source)) => return Err(self.stream_error(source)),
                Err(_) => break,
            }
        }

        let status = self.wait_status()?;
        if status.success() {
            Ok(())
        } else {
            Err(PipeError::Process {
                command: self.command.clone(),
                status,
                tail: tail_of(&self.remaining),
            })
        }
    }

    /// Text buffered after the phase boundary. Valid once
    /// `await_completion` has returned; the buffer is handed out once.
    pub fn drain_remaining(&mut self) -> String {
        std::mem::take(&mut self.remaining)
    }

    /// Kill the child and reap it. Awaits issued afterwards fail with
    /// `Process` instead of hanging.
    pub fn kill(&mut self) {
        log::debug!("killing simulation: {}", self.command);
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    fn wait_status(&mut self) -> Result<ExitStatus, PipeError> {
        self.child
            .wait()
            .map_err(|source| self.stream_error(source))
    }

    fn stream_error(&self, source: io::Error) -> PipeError {
        PipeError::Stream {
            command: self.command.clone(),
            source,
        }
    }
}

impl Drop for TracePipe {
    fn drop(&mut self) {
        // Killing an already-exited child is a harmless error; the wait
        // reaps either way
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Last few lines of a buffered segment, for error context
fn tail_of(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join("\n")
}
