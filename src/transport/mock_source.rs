//! Scripted read source for testing.
//!
//! Replays a fixed sequence of reads instead of talking to hardware. Useful
//! for driving sessions and the manager without a controller attached.

use std::collections::VecDeque;

use log::debug;

use crate::transport::{ReadSource, TransportError};

#[derive(Debug)]
enum Step {
    Report(Vec<u8>),
    Empty,
    Fail(TransportError),
}

/// Read source that replays queued reports, gaps and errors in order
#[derive(Debug)]
pub struct ScriptedSource {
    name: String,
    steps: VecDeque<Step>,
    disconnect_when_drained: bool,
    reads: usize,
}

impl ScriptedSource {
    /// Create an empty script; once drained every read reports no data
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: VecDeque::new(),
            disconnect_when_drained: false,
            reads: 0,
        }
    }

    /// Queue a report
    pub fn report(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.steps.push_back(Step::Report(bytes.into()));
        self
    }

    /// Queue a read with no data ready
    pub fn empty(mut self) -> Self {
        self.steps.push_back(Step::Empty);
        self
    }

    /// Queue a transport failure
    pub fn fail(mut self, error: TransportError) -> Self {
        self.steps.push_back(Step::Fail(error));
        self
    }

    /// Report [`TransportError::Disconnected`] once the script runs out
    pub fn then_disconnect(mut self) -> Self {
        self.disconnect_when_drained = true;
        self
    }

    /// Number of reads performed so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl ReadSource for ScriptedSource {
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.reads += 1;

        match self.steps.pop_front() {
            Some(Step::Report(bytes)) => {
                // Like a HID read, an oversized report is truncated to the buffer
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                debug!("[MOCK SOURCE] {} read {} bytes", self.name, n);
                Ok(n)
            }
            Some(Step::Empty) => Ok(0),
            Some(Step::Fail(e)) => Err(e),
            None if self.disconnect_when_drained => Err(TransportError::Disconnected),
            None => Ok(0),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
