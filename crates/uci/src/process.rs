//! Engine subprocess with a line-oriented pipe.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::{EngineError, EngineMessage, GuiCommand};

/// A running engine process.
///
/// A reader thread forwards every stdout line over a channel, so waiting for
/// a reply never blocks past its timeout.
pub struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    command: String,
}

impl EngineProcess {
    /// Spawns an engine from a command line such as `"stockfish"` or
    /// `"sh engine.sh"`.
    pub fn spawn(command: &str) -> Result<Self, EngineError> {
        let mut words = command.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| EngineError::Spawn(command.to_string(), "empty command".to_string()))?;

        let mut child = Command::new(program)
            .args(words)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Spawn(command.to_string(), e.to_string()))?;

        let stdin = child.stdin.take().ok_or(EngineError::Closed)?;
        let stdout = child.stdout.take().ok_or(EngineError::Closed)?;

        let (sender, lines) = mpsc::channel();
        thread::Builder::new()
            .name("uci-reader".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    tracing::trace!("uci < {}", line);
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            })?;

        tracing::info!("Started engine: {}", command);
        Ok(Self {
            child,
            stdin,
            lines,
            command: command.to_string(),
        })
    }

    /// The command line the engine was started with.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Sends one command line.
    pub fn send(&mut self, command: &GuiCommand) -> Result<(), EngineError> {
        let line = command.to_uci();
        tracing::debug!("uci > {}", line);
        writeln!(self.stdin, "{}", line)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Waits up to `timeout` for the next line.
    ///
    /// Returns `Ok(None)` on timeout and [`EngineError::Closed`] once the
    /// engine's output has ended.
    pub fn recv(&self, timeout: Duration) -> Result<Option<EngineMessage>, EngineError> {
        match self.lines.recv_timeout(timeout) {
            Ok(line) => Ok(Some(EngineMessage::parse(&line))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Closed),
        }
    }

    /// Reads lines until `accept` picks one out, or `timeout` elapses.
    pub fn wait_for<T>(
        &self,
        timeout: Duration,
        mut accept: impl FnMut(EngineMessage) -> Option<T>,
    ) -> Result<Option<T>, EngineError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            match self.recv(remaining)? {
                Some(message) => {
                    if let Some(found) = accept(message) {
                        return Ok(Some(found));
                    }
                }
                None => return Ok(None),
            }
        }
    }

    /// Discards lines that arrived since the last request.
    pub fn drain(&self) {
        while self.lines.try_recv().is_ok() {}
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        let _ = self.send(&GuiCommand::Quit);
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
