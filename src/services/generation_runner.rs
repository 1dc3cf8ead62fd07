use crate::data::AssetCatalog;
use crate::engines::generation::progress::{ChannelProgressCallback, ProgressMessage};
use crate::error::{Result, TilemapError};
use crate::services::map_generator::{generate_map, MapRequest};
use crate::types::GeneratedMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Result from a background generation run
pub type GenerationResult = Result<GeneratedMap>;

/// Runs [`generate_map`] on a worker thread for interactive hosts.
pub struct GenerationRunner {
    handle: Option<JoinHandle<GenerationResult>>,
    progress_rx: Receiver<ProgressMessage>,
    cancel_flag: Arc<AtomicBool>,
}

impl GenerationRunner {
    /// Start generation in background thread
    pub fn start(catalog: Arc<AssetCatalog>, request: MapRequest) -> Result<Self> {
        let (progress_tx, progress_rx) = channel();
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let mut callback = ChannelProgressCallback::new(progress_tx, Arc::clone(&cancel_flag));

        let handle = thread::Builder::new()
            .name("tilemap-generation".to_string())
            .spawn(move || {
                log::debug!("Generation thread started");
                generate_map(&catalog, &request, &mut callback)
            })?;

        Ok(Self {
            handle: Some(handle),
            progress_rx,
            cancel_flag,
        })
    }

    /// Poll for progress updates (non-blocking)
    pub fn poll_progress(&self) -> Option<ProgressMessage> {
        self.progress_rx.try_recv().ok()
    }

    /// Check if generation is complete and get results
    pub fn try_get_result(&mut self) -> Option<GenerationResult> {
        let handle = self.handle.take()?;
        if handle.is_finished() {
            Some(Self::join(handle))
        } else {
            self.handle = Some(handle);
            None
        }
    }

    /// Block until the worker finishes.
    pub fn wait(mut self) -> GenerationResult {
        match self.handle.take() {
            Some(handle) => Self::join(handle),
            None => Err(TilemapError::Configuration("result already taken".to_string())),
        }
    }

    /// Cancel the running generation at the next generation boundary
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    fn join(handle: JoinHandle<GenerationResult>) -> GenerationResult {
        handle.join().unwrap_or_else(|_| {
            Err(TilemapError::Configuration(
                "generation thread panicked".to_string(),
            ))
        })
    }
}

impl Drop for GenerationRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}
