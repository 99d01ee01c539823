//! Per-user synthesis session.
//!
//! A session owns at most one loaded artifact and runs at most one model
//! call at a time. Each call is bounded by a timeout, can be cancelled from
//! another task, and is optionally retried with a fixed delay.

use crate::ai::SynthesisService;
use crate::models::{
    Config, ExtractionStatus, SynthesisRequest, SynthesisResult, TargetLanguage, UploadedArtifact,
};
use crate::normalizer::{build_request, interpret_response};
use crate::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Where the current upload cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NoFile,
    FileLoaded,
    RequestBuilt,
    AwaitingModel,
    Succeeded,
    SucceededEmpty,
    Failed,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub timeout: Duration,
    pub max_attempts: usize,
    pub retry_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_attempts: 1,
            retry_delay: Duration::from_millis(2000),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.timeout,
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay,
        }
    }
}

struct Cycle {
    phase: Phase,
    artifact: Option<UploadedArtifact>,
}

pub struct Session {
    id: Uuid,
    service: Arc<dyn SynthesisService>,
    options: SessionOptions,
    cycle: Mutex<Cycle>,
    in_flight: AtomicBool,
    cancel_tx: Mutex<Option<watch::Sender<bool>>>,
}

/// Clears the in-flight flag however the call ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::SynthesisInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Session {
    pub fn new(service: Arc<dyn SynthesisService>, options: SessionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            service,
            options,
            cycle: Mutex::new(Cycle {
                phase: Phase::NoFile,
                artifact: None,
            }),
            in_flight: AtomicBool::new(false),
            cancel_tx: Mutex::new(None),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        lock(&self.cycle).phase
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Start a new cycle with `artifact`, replacing any previous one.
    pub fn load(&self, artifact: UploadedArtifact) -> Result<()> {
        if self.is_busy() {
            return Err(Error::SynthesisInFlight);
        }
        info!(
            "[{}] Loaded artifact ({}, {} bytes)",
            self.id,
            artifact.declared_mime_type,
            artifact.size_bytes()
        );
        let mut cycle = lock(&self.cycle);
        cycle.artifact = Some(artifact);
        cycle.phase = Phase::FileLoaded;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.is_busy() {
            return Err(Error::SynthesisInFlight);
        }
        let mut cycle = lock(&self.cycle);
        cycle.artifact = None;
        cycle.phase = Phase::NoFile;
        Ok(())
    }

    /// Abort the outstanding model call, if any. Returns whether one was
    /// in flight.
    pub fn cancel(&self) -> bool {
        match lock(&self.cancel_tx).as_ref() {
            Some(tx) if self.is_busy() => {
                info!("[{}] Cancelling synthesis", self.id);
                tx.send(true).is_ok()
            }
            _ => false,
        }
    }

    fn set_phase(&self, phase: Phase) {
        lock(&self.cycle).phase = phase;
    }

    /// Run one synthesis for the loaded artifact.
    ///
    /// Fails immediately with [`Error::SynthesisInFlight`] if another call
    /// on this session has not finished yet.
    pub async fn synthesize(&self, lang: TargetLanguage) -> Result<SynthesisResult> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let artifact = lock(&self.cycle).artifact.clone().ok_or(Error::NoArtifact)?;

        let request = match build_request(&artifact, lang) {
            Ok(request) => request,
            Err(e) => {
                self.set_phase(Phase::Failed);
                return Err(e);
            }
        };
        drop(artifact);
        self.set_phase(Phase::RequestBuilt);

        let (tx, mut rx) = watch::channel(false);
        *lock(&self.cancel_tx) = Some(tx);

        self.set_phase(Phase::AwaitingModel);
        info!("[{}] Synthesizing {} code", self.id, lang);

        let outcome = tokio::select! {
            reply = self.call_with_retry(&request) => reply,
            _ = async {
                let signalled = rx.wait_for(|cancelled| *cancelled).await.is_ok();
                if !signalled {
                    std::future::pending::<()>().await;
                }
            } => Err(Error::Cancelled),
        };

        *lock(&self.cancel_tx) = None;

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                let e = e.into_synthesis_failure();
                error!("[{}] Synthesis failed: {}", self.id, e);
                self.set_phase(Phase::Failed);
                return Err(e);
            }
        };

        let result = interpret_response(raw.as_deref(), lang);
        match result.status() {
            ExtractionStatus::Extracted => {
                info!("[{}] Synthesis succeeded", self.id);
                self.set_phase(Phase::Succeeded);
            }
            ExtractionStatus::Empty => {
                warn!("[{}] Model returned no code; the scan may be illegible", self.id);
                self.set_phase(Phase::SucceededEmpty);
            }
        }
        Ok(result)
    }

    async fn call_with_retry(&self, request: &SynthesisRequest) -> Result<Option<String>> {
        let retries = self.options.max_attempts.saturating_sub(1);
        let strategy =
            FixedInterval::from_millis(self.options.retry_delay.as_millis() as u64).take(retries);
        let timeout = self.options.timeout;
        let mut attempt = 0usize;

        Retry::spawn(strategy, || {
            attempt += 1;
            let current = attempt;
            async move {
                match tokio::time::timeout(timeout, self.service.synthesize(request)).await {
                    Ok(Ok(text)) => Ok(text),
                    Ok(Err(e)) => {
                        warn!(
                            "[{}] Attempt {}/{} failed: {}",
                            self.id, current, self.options.max_attempts, e
                        );
                        Err(e)
                    }
                    Err(_) => {
                        warn!(
                            "[{}] Attempt {}/{} timed out after {:?}",
                            self.id, current, self.options.max_attempts, timeout
                        );
                        Err(Error::Timeout(timeout))
                    }
                }
            }
        })
        .await
    }
}
