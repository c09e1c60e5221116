//! Background comparison thread.
//!
//! `compare` never yields, so callers that must stay responsive hand the
//! documents to this worker and collect the result later. Every job gets a
//! ticket; results for tickets older than the one being waited on are
//! dropped, which is how a superseded or abandoned comparison is discarded.

use crate::engine::{CompareOptions, ComparisonResult, compare_with};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("comparison worker stopped")]
    Disconnected,

    #[error("comparison did not finish within {0:?}")]
    Timeout(Duration),

    #[error("comparison {0} was superseded by a newer request")]
    Superseded(u64),
}

pub enum CompareRequest {
    Compare {
        ticket: u64,
        left: String,
        right: String,
        options: CompareOptions,
    },
    Stop,
}

#[derive(Debug)]
pub struct CompareResponse {
    pub ticket: u64,
    pub result: ComparisonResult,
}

/// Handle to the comparison thread
pub struct Comparer {
    sender: Sender<CompareRequest>,
    receiver: Receiver<CompareResponse>,
    last_ticket: u64,
}

impl Comparer {
    /// Queue a comparison and return its ticket.
    pub fn submit(
        &mut self,
        left: impl Into<String>,
        right: impl Into<String>,
        options: CompareOptions,
    ) -> Result<u64, WorkerError> {
        let ticket = self.last_ticket + 1;
        self.sender
            .send(CompareRequest::Compare {
                ticket,
                left: left.into(),
                right: right.into(),
                options,
            })
            .map_err(|_| WorkerError::Disconnected)?;
        self.last_ticket = ticket;
        Ok(ticket)
    }

    /// Block until `ticket` is done or `timeout` elapses.
    pub fn wait_timeout(&self, ticket: u64, timeout: Duration) -> Result<ComparisonResult, WorkerError> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(response) if response.ticket == ticket => return Ok(response.result),
                Ok(response) if response.ticket > ticket => {
                    return Err(WorkerError::Superseded(ticket));
                }
                Ok(response) => {
                    debug!(ticket = response.ticket, "discarding stale comparison");
                }
                Err(RecvTimeoutError::Timeout) => return Err(WorkerError::Timeout(timeout)),
                Err(RecvTimeoutError::Disconnected) => return Err(WorkerError::Disconnected),
            }
        }
    }

    /// Non-blocking poll for the result of the most recent submission.
    pub fn latest(&self) -> Option<CompareResponse> {
        let mut newest = None;
        while let Ok(response) = self.receiver.try_recv() {
            if response.ticket == self.last_ticket {
                newest = Some(response);
            } else {
                debug!(ticket = response.ticket, "discarding stale comparison");
            }
        }
        newest
    }
}

impl Drop for Comparer {
    fn drop(&mut self) {
        // The thread finishes its current job, then exits
        let _ = self.sender.send(CompareRequest::Stop);
    }
}

fn run(receiver: Receiver<CompareRequest>, response_sender: Sender<CompareResponse>) {
    while let Ok(request) = receiver.recv() {
        match request {
            CompareRequest::Compare {
                ticket,
                left,
                right,
                options,
            } => {
                let result = compare_with(&left, &right, &options);
                if response_sender
                    .send(CompareResponse { ticket, result })
                    .is_err()
                {
                    debug!("comparison handle dropped, stopping worker");
                    break;
                }
            }
            CompareRequest::Stop => break,
        }
    }
}

pub fn spawn_comparer() -> Comparer {
    let (sender, receiver) = mpsc::channel();
    let (response_sender, response_receiver) = mpsc::channel();
    thread::spawn(move || run(receiver, response_sender));
    Comparer {
        sender,
        receiver: response_receiver,
        last_ticket: 0,
    }
}
