//! Background thread that runs search lookups off the UI thread.

use anyhow::{Context, Result};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use super::{LookupRequest, LookupResponse, RecordLookup, SearchEngine, SearchSettings};

/// Worker thread fed through a request channel.
///
/// Responses come back in completion order; the engine decides which ones
/// are still current.
pub struct LookupWorker {
    requests: Option<Sender<LookupRequest>>,
    responses: Receiver<LookupResponse>,
    handle: Option<JoinHandle<()>>,
}

impl LookupWorker {
    /// Spawns the worker thread.
    pub fn spawn(lookup: Arc<dyn RecordLookup>, settings: SearchSettings) -> Self {
        let (request_tx, request_rx) = channel::<LookupRequest>();
        let (response_tx, response_rx) = channel();

        let handle = thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let response = SearchEngine::execute_lookup(lookup.as_ref(), &request, &settings);
                debug!(
                    generation = response.generation,
                    results = response.results.len(),
                    "Search lookup finished"
                );
                if response_tx.send(response).is_err() {
                    break;
                }
            }
        });

        Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
        }
    }

    /// Queues a lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread has stopped.
    pub fn submit(&self, request: LookupRequest) -> Result<()> {
        self.requests
            .as_ref()
            .context("Lookup worker is shut down")?
            .send(request)
            .ok()
            .context("Lookup worker thread has stopped")
    }

    /// Returns the next finished response, if any.
    pub fn poll(&self) -> Option<LookupResponse> {
        match self.responses.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for LookupWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lead;
    use crate::services::RecordSet;
    use std::time::{Duration, Instant};

    fn wait_for(worker: &LookupWorker) -> LookupResponse {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(response) = worker.poll() {
                return response;
            }
            assert!(Instant::now() < deadline, "lookup worker timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_worker_returns_tagged_response() {
        let records = RecordSet {
            leads: vec![Lead {
                id: "l1".to_string(),
                lead_name: "Acme Corp".to_string(),
                company_name: None,
                email: None,
                lead_status: None,
            }],
            ..RecordSet::default()
        };
        let worker = LookupWorker::spawn(Arc::new(records), SearchSettings::default());
        worker
            .submit(LookupRequest {
                generation: 7,
                query: "acme".to_string(),
            })
            .unwrap();

        let response = wait_for(&worker);
        assert_eq!(response.generation, 7);
        assert_eq!(response.results.len(), 1);
    }
}
