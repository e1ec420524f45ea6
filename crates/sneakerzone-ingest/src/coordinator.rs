//! Drives one ingest run: walk, filter, parse, file into the index.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use sneakerzone_core::error::AccessError;
use sneakerzone_core::filename::{self, NameError};
use sneakerzone_core::traits::FileAccess;
use sneakerzone_core::{BucketKey, CatalogIndex, IngestionTally, ProductRecord, Segment};

use crate::walker::{FileEntry, TreeWalker, WalkError};

/// Cooperative stop flag shared between the caller and a run.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Error)]
pub enum AbortReason {
    #[error("cancelled before the walk started")]
    Cancelled,
    #[error("root folder is not accessible: {0}")]
    AccessDenied(#[source] AccessError),
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// Nothing was touched.
    #[error("ingest aborted: {0}")]
    Aborted(AbortReason),

    /// Records filed before the failure stay in the index.
    #[error("host failure at '{dir}': {source}")]
    Host {
        dir: String,
        #[source]
        source: AccessError,
    },
}

impl IngestError {
    /// The user backed out; nothing to alarm anyone about.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, IngestError::Aborted(AbortReason::Cancelled))
    }
}

#[derive(Debug, Error)]
pub enum RejectReason {
    #[error("unsupported extension '{0}'")]
    Extension(String),
    #[error("filename does not match: {0}")]
    Grammar(#[source] NameError),
    #[error("no bucket can receive {brand}/{segment}")]
    NoBucket { brand: String, segment: Segment },
    #[error("could not read file: {0}")]
    Read(#[source] AccessError),
}

#[derive(Debug)]
pub enum EntryOutcome {
    Accepted(BucketKey),
    Rejected(RejectReason),
}

/// Hooks a caller can inject to follow a run or refresh its views after it.
pub trait IngestObserver {
    fn on_entry(&mut self, _name: &str, _outcome: &EntryOutcome) {}

    fn on_complete(&mut self, _index: &CatalogIndex, _tally: &IngestionTally) {}
}

pub struct Ingestor<'a, A: FileAccess + ?Sized> {
    access: &'a A,
    stop: Option<StopSignal>,
    observer: Option<&'a mut dyn IngestObserver>,
}

impl<'a, A: FileAccess + ?Sized> Ingestor<'a, A> {
    pub fn new(access: &'a A) -> Self {
        Self { access, stop: None, observer: None }
    }

    pub fn with_stop(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_observer(mut self, observer: &'a mut dyn IngestObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Walk `root` and file every matching image into `index`.
    ///
    /// Each yielded file counts exactly once, as accepted or rejected.
    pub fn run(&mut self, root: &A::Handle, index: &mut CatalogIndex) -> Result<IngestionTally, IngestError> {
        if self.stopped() {
            return Err(IngestError::Aborted(AbortReason::Cancelled));
        }
        let mut walker = TreeWalker::new(self.access, root).map_err(|source| {
            if source.is_denied() {
                IngestError::Aborted(AbortReason::AccessDenied(source))
            } else {
                IngestError::Host { dir: format!("{root:?}"), source }
            }
        })?;

        let mut tally = IngestionTally::default();
        loop {
            if self.stopped() {
                info!(accepted = tally.accepted, rejected = tally.rejected, "stop requested, ending run early");
                break;
            }
            let Some(item) = walker.next() else { break };
            let file = match item {
                Ok(file) => file,
                Err(WalkError::Skipped { dir, source }) => {
                    warn!(dir = %dir, error = %source, "skipping unreadable directory");
                    continue;
                }
                Err(WalkError::Fault { dir, source }) => return Err(IngestError::Host { dir, source }),
            };

            let outcome = self.process(&file, index);
            match &outcome {
                EntryOutcome::Accepted(key) => {
                    tally.accepted += 1;
                    debug!(file = %file.name, bucket = %key, "accepted");
                }
                EntryOutcome::Rejected(reason) => {
                    tally.rejected += 1;
                    debug!(file = %file.name, reason = %reason, "rejected");
                }
            }
            if let Some(observer) = self.observer.as_deref_mut() {
                observer.on_entry(&file.name, &outcome);
            }
        }

        info!(accepted = tally.accepted, rejected = tally.rejected, buckets = index.len(), "ingest finished");
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_complete(index, &tally);
        }
        Ok(tally)
    }

    fn process(&self, file: &FileEntry<A::Handle>, index: &mut CatalogIndex) -> EntryOutcome {
        let ext = filename::extension_of(&file.name);
        if !filename::is_image_extension(&ext) {
            return EntryOutcome::Rejected(RejectReason::Extension(ext));
        }
        let name = match filename::parse(&file.name) {
            Ok(name) => name,
            Err(e) => return EntryOutcome::Rejected(RejectReason::Grammar(e)),
        };
        // Resolve before reading so rejected files never leave empty buckets.
        let Some(key) = index.resolve(&name.brand, name.segment) else {
            return EntryOutcome::Rejected(RejectReason::NoBucket { brand: name.brand, segment: name.segment });
        };
        let source = match self.access.read_displayable(&file.handle) {
            Ok(source) => source,
            Err(e) => return EntryOutcome::Rejected(RejectReason::Read(e)),
        };
        let id = index.ensure_bucket(&name.brand, key.segment);
        index.append(id, ProductRecord::new(name, source));
        EntryOutcome::Accepted(key)
    }

    fn stopped(&self) -> bool {
        self.stop.as_ref().is_some_and(StopSignal::is_stopped)
    }
}

/// Ingest everything under `root` into `index`.
pub fn ingest<A: FileAccess + ?Sized>(
    access: &A,
    root: &A::Handle,
    index: &mut CatalogIndex,
) -> Result<IngestionTally, IngestError> {
    Ingestor::new(access).run(root, index)
}
