use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use rayon::prelude::*;
use regex::Regex;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScrollscapeError, ScrollscapeResult};

/// Default pattern used to pull the sequence number out of a frame's name.
pub const DEFAULT_FRAME_PATTERN: &str = r"frame-(\d+)";

/// Where the encoded bytes of a frame come from.
#[derive(Clone, Debug)]
pub enum FrameOrigin {
    /// Read from the filesystem when the frame is loaded.
    Path(PathBuf),
    /// Already resident in memory.
    Bytes(Arc<[u8]>),
}

/// One image resource locator as supplied by the asset-resolution collaborator.
#[derive(Clone, Debug)]
pub struct FrameSource {
    name: String,
    origin: FrameOrigin,
}

impl FrameSource {
    /// A frame read from `path`; its name is the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            origin: FrameOrigin::Path(path),
        }
    }

    /// A frame backed by in-memory encoded bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            origin: FrameOrigin::Bytes(bytes.into()),
        }
    }

    /// Resource name used for ordering.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Origin of the encoded bytes.
    pub fn origin(&self) -> &FrameOrigin {
        &self.origin
    }

    /// Enumerate the image files in `dir` whose extension is in `extensions`.
    ///
    /// The returned order is whatever the filesystem yields and must not be relied upon.
    pub fn discover(dir: &Path, extensions: &[String]) -> ScrollscapeResult<Vec<Self>> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            ScrollscapeError::asset(format!("failed to read frame dir '{}': {e}", dir.display()))
        })?;

        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ScrollscapeError::asset(format!("failed to list '{}': {e}", dir.display()))
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)) {
                out.push(Self::from_path(path));
            }
        }
        tracing::debug!(dir = %dir.display(), count = out.len(), "discovered frames");
        Ok(out)
    }

    fn read_bytes(&self) -> ScrollscapeResult<Arc<[u8]>> {
        match &self.origin {
            FrameOrigin::Bytes(b) => Ok(b.clone()),
            FrameOrigin::Path(p) => std::fs::read(p).map(Arc::from).map_err(|e| {
                ScrollscapeError::asset(format!("failed to read frame '{}': {e}", p.display()))
            }),
        }
    }
}

/// One entry of a loaded sequence.
#[derive(Clone, Debug)]
pub enum FrameSlot {
    /// Decoded and drawable.
    Ready(PreparedImage),
    /// Failed to read or decode; kept so indices stay aligned with the sequence order.
    Failed {
        /// Resource name.
        name: String,
        /// Human-readable failure reason.
        reason: String,
    },
}

impl FrameSlot {
    /// The decoded image, if this slot is drawable.
    pub fn image(&self) -> Option<&PreparedImage> {
        match self {
            Self::Ready(img) => Some(img),
            Self::Failed { .. } => None,
        }
    }
}

/// Ordered, immutable list of frames produced by [`FrameSequenceLoader`].
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    slots: Vec<FrameSlot>,
}

impl FrameSequence {
    /// Number of slots, including failed ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Return `true` when no sources were supplied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Borrow a slot.
    pub fn slot(&self, idx: FrameIndex) -> Option<&FrameSlot> {
        self.slots.get(idx.0)
    }

    /// Borrow the decoded image at `idx`; `None` for out-of-range or failed frames.
    pub fn image(&self, idx: FrameIndex) -> Option<&PreparedImage> {
        self.slot(idx).and_then(FrameSlot::image)
    }

    /// Number of frames that failed to load.
    pub fn failed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, FrameSlot::Failed { .. }))
            .count()
    }

    /// Iterate over all slots in sequence order.
    pub fn slots(&self) -> impl Iterator<Item = &FrameSlot> {
        self.slots.iter()
    }
}

/// Orders frame sources by their embedded sequence number and decodes them.
#[derive(Clone, Debug)]
pub struct FrameSequenceLoader {
    pattern: Regex,
}

impl Default for FrameSequenceLoader {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_FRAME_PATTERN).expect("default frame pattern is valid"),
        }
    }
}

impl FrameSequenceLoader {
    /// Create a loader using `pattern`; its first capture group must match the sequence number.
    pub fn new(pattern: &str) -> ScrollscapeResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            ScrollscapeError::validation(format!("invalid frame pattern '{pattern}': {e}"))
        })?;
        if pattern.captures_len() < 2 {
            return Err(ScrollscapeError::validation(
                "frame pattern must contain a capture group for the sequence number",
            ));
        }
        Ok(Self { pattern })
    }

    /// Sequence number embedded in `name`, if the pattern matches.
    pub fn sequence_number(&self, name: &str) -> Option<u64> {
        self.pattern
            .captures(name)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
    }

    /// Sort sources ascending by sequence number.
    ///
    /// Names without a number sort as `0`; ties fall back to the name so the order never depends
    /// on enumeration order.
    pub fn order(&self, mut sources: Vec<FrameSource>) -> Vec<FrameSource> {
        sources.sort_by_cached_key(|s| {
            let n = self.sequence_number(&s.name).unwrap_or(0);
            (n, s.name.clone())
        });
        sources
    }

    /// Order and decode every source on the calling thread's rayon pool.
    ///
    /// Failed frames are kept as [`FrameSlot::Failed`]; the call itself never fails.
    #[tracing::instrument(skip_all, fields(frames = sources.len()))]
    pub fn load_blocking(&self, sources: Vec<FrameSource>) -> FrameSequence {
        self.load_with_cancel(sources, &AtomicBool::new(false))
    }

    /// Start loading on a background thread and return a handle to poll for completion.
    ///
    /// The scheduler and input handling keep running while frames decode.
    #[tracing::instrument(skip_all, fields(frames = sources.len()))]
    pub fn spawn(&self, sources: Vec<FrameSource>) -> ScrollscapeResult<PendingSequence> {
        let (tx, rx) = mpsc::sync_channel(1);
        let cancel = Arc::new(AtomicBool::new(false));

        let loader = self.clone();
        let worker_cancel = cancel.clone();
        std::thread::Builder::new()
            .name("scrollscape-frame-loader".to_owned())
            .spawn(move || {
                let seq = loader.load_with_cancel(sources, &worker_cancel);
                if worker_cancel.load(Ordering::Acquire) {
                    tracing::debug!("frame load cancelled; result discarded");
                    return;
                }
                // Receiver gone means the owner was torn down.
                let _ = tx.send(seq);
            })
            .map_err(|e| ScrollscapeError::asset(format!("failed to spawn frame loader: {e}")))?;

        Ok(PendingSequence {
            rx: Some(rx),
            cancel,
        })
    }

    fn load_with_cancel(&self, sources: Vec<FrameSource>, cancel: &AtomicBool) -> FrameSequence {
        let ordered = self.order(sources);
        let slots: Vec<FrameSlot> = ordered
            .par_iter()
            .map(|src| {
                if cancel.load(Ordering::Relaxed) {
                    return FrameSlot::Failed {
                        name: src.name.clone(),
                        reason: "cancelled".to_owned(),
                    };
                }
                match src.read_bytes().and_then(|b| decode_image(&b)) {
                    Ok(img) => FrameSlot::Ready(img),
                    Err(e) => {
                        tracing::warn!(
                            frame = %src.name,
                            error = %e,
                            "frame failed to load; keeping empty slot"
                        );
                        FrameSlot::Failed {
                            name: src.name.clone(),
                            reason: e.to_string(),
                        }
                    }
                }
            })
            .collect();

        let seq = FrameSequence { slots };
        tracing::info!(
            frames = seq.len(),
            failed = seq.failed_count(),
            "frame sequence loaded"
        );
        seq
    }
}

/// Handle to a frame sequence that is still loading.
///
/// Dropping the handle cancels outstanding work; no completion is observable afterwards.
#[derive(Debug)]
pub struct PendingSequence {
    rx: Option<mpsc::Receiver<FrameSequence>>,
    cancel: Arc<AtomicBool>,
}

impl PendingSequence {
    /// Non-blocking check for completion. Returns the sequence exactly once.
    pub fn poll(&mut self) -> Option<FrameSequence> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(seq) => {
                self.rx = None;
                Some(seq)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!("frame loader exited without a result");
                self.rx = None;
                None
            }
        }
    }

    /// Block until the sequence is available. Used by batch tools, never by the render loop.
    pub fn wait(mut self) -> Option<FrameSequence> {
        let rx = self.rx.take()?;
        rx.recv().ok()
    }

    /// Return `true` while a result may still arrive.
    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }

    /// Stop outstanding decode work and drop the result channel.
    pub fn cancel(&mut self) {
        self.cancel.store(true, Ordering::Release);
        self.rx = None;
    }
}

impl Drop for PendingSequence {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sequence.rs"]
mod tests;
