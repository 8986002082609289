//! Core conversion pipeline: scan a directory, convert matched images
//! between PNG and WebP, write results back to the same directory.

pub mod access;
pub mod batch;
pub mod encoder;
pub mod naming;
pub mod raster;
pub mod scanner;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use self::access::{probe_gate, AccessGate, AccessMode};
use self::batch::{BatchOutcome, BatchReport, ConversionLog, LogEntry};
use self::raster::{probe_decoder, DecodeStrategy};
use self::scanner::ImageEntry;
use crate::error::ConvertError;
use crate::utils::format_size;

pub const PNG_MIME: &str = "image/png";
pub const WEBP_MIME: &str = "image/webp";

/// Static configuration of one conversion direction: which suffix selects
/// candidates, which suffix and type the output gets, and the label shown
/// to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    PngToWebp,
    WebpToPng,
}

impl ConversionDirection {
    pub fn source_suffix(self) -> &'static str {
        match self {
            Self::PngToWebp => ".png",
            Self::WebpToPng => ".webp",
        }
    }

    pub fn target_suffix(self) -> &'static str {
        match self {
            Self::PngToWebp => ".webp",
            Self::WebpToPng => ".png",
        }
    }

    pub fn target_mime(self) -> &'static str {
        match self {
            Self::PngToWebp => WEBP_MIME,
            Self::WebpToPng => PNG_MIME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PngToWebp => "PNG to WebP",
            Self::WebpToPng => "WebP to PNG",
        }
    }
}

/// Mutable session view owned by the engine.
///
/// The presentation layer reads snapshots of this struct and dispatches
/// intents; it never mutates it directly. The busy flags exist for that
/// layer to disable its triggers while an operation is in flight; the
/// engine itself is already serialized by `&mut self`.
#[derive(Debug, Default)]
pub struct SessionState {
    pub inventory: Vec<ImageEntry>,
    pub log: ConversionLog,
    /// Single rolling status line reflecting the current step.
    pub status: String,
    pub is_scanning: bool,
    pub is_converting: bool,
}

impl SessionState {
    /// Inventory entries carrying the given MIME type.
    pub fn count_of(&self, mime: &str) -> usize {
        self.inventory.iter().filter(|e| e.mime_type == mime).count()
    }
}

/// Owns the chosen directory, the probed strategies, and the session state.
pub struct ConversionEngine {
    dir: PathBuf,
    gate: Box<dyn AccessGate>,
    decoder: Box<dyn DecodeStrategy>,
    state: SessionState,
}

impl ConversionEngine {
    pub fn new(dir: PathBuf, gate: Box<dyn AccessGate>, decoder: Box<dyn DecodeStrategy>) -> Self {
        Self {
            dir,
            gate,
            decoder,
            state: SessionState::default(),
        }
    }

    /// Build an engine with strategies probed from the environment.
    pub fn with_probed_strategies(dir: PathBuf, assume_granted: bool) -> Self {
        Self::new(dir, probe_gate(assume_granted), probe_decoder())
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Rebuild the inventory from the directory's current contents.
    ///
    /// Requires read access; a refusal or an enumeration failure leaves the
    /// previous inventory in place and surfaces through the status line and
    /// the returned error.
    pub fn rescan(&mut self) -> Result<(), ConvertError> {
        self.state.is_scanning = true;
        self.state.status = format!("Scanning {}", self.dir.display());

        let result = if self.gate.ensure(&self.dir, AccessMode::Read) {
            scanner::scan(&self.dir)
        } else {
            Err(ConvertError::PermissionDenied {
                path: self.dir.clone(),
            })
        };

        self.state.is_scanning = false;
        match result {
            Ok(inventory) => {
                self.state.status = format!("Found {} image(s)", inventory.len());
                self.state.inventory = inventory;
                Ok(())
            }
            Err(err) => {
                self.state.status = err.to_string();
                Err(err)
            }
        }
    }

    /// Run one batch for `direction` over the current inventory.
    ///
    /// State machine per batch: Idle → PermissionCheck → (Denied |
    /// Processing) → Completed. Matched entries are processed sequentially
    /// in scan order; each outcome is appended to the session log and
    /// handed to `on_entry` with the (done, total) progress pair. A failed
    /// entry never aborts the batch. After the last entry the directory is
    /// rescanned so newly written files show up in the inventory.
    pub fn convert<F>(
        &mut self,
        direction: ConversionDirection,
        mut on_entry: F,
    ) -> Result<BatchReport, ConvertError>
    where
        F: FnMut(usize, usize, &LogEntry),
    {
        let started = Instant::now();

        let matched: Vec<ImageEntry> = self
            .state
            .inventory
            .iter()
            .filter(|entry| naming::has_suffix(&entry.name, direction.source_suffix()))
            .cloned()
            .collect();

        if matched.is_empty() {
            self.state.status = format!("No {} files to convert", direction.source_suffix());
            return Ok(BatchReport::terminal(BatchOutcome::NoTargets, started.elapsed()));
        }

        if !self.gate.ensure(&self.dir, AccessMode::ReadWrite) {
            self.state.status = format!("Write access to {} was denied", self.dir.display());
            return Ok(BatchReport::terminal(BatchOutcome::Denied, started.elapsed()));
        }

        self.state.is_converting = true;
        let total = matched.len();
        let mut converted = 0usize;
        let mut failed = 0usize;

        for (index, entry) in matched.iter().enumerate() {
            self.state.status = format!("Converting {} ({}/{})", entry.name, index + 1, total);

            let log_entry = match self.convert_entry(entry, direction) {
                Ok((derived_name, size)) => {
                    converted += 1;
                    LogEntry::success(entry.name.clone(), derived_name, format_size(size))
                }
                Err(err) => {
                    failed += 1;
                    LogEntry::failure(entry.name.clone(), err.to_string())
                }
            };
            self.state.log.push(log_entry.clone());
            on_entry(index + 1, total, &log_entry);
        }
        self.state.is_converting = false;

        // Pick up the files this batch just wrote.
        self.rescan()?;
        self.state.status = format!("Converted {}/{} file(s)", converted, total);

        Ok(BatchReport {
            outcome: BatchOutcome::Completed,
            attempted: total,
            converted,
            failed,
            elapsed: started.elapsed(),
        })
    }

    /// Full step sequence for one file. Runs to completion or failure
    /// before the next entry starts; the raster source is released on both
    /// paths.
    fn convert_entry(
        &self,
        entry: &ImageEntry,
        direction: ConversionDirection,
    ) -> Result<(String, u64), ConvertError> {
        let bytes = fs::read(&entry.path).map_err(|err| ConvertError::Read {
            name: entry.name.clone(),
            source: err,
        })?;

        let source = self.decoder.rasterize(&entry.name, &bytes)?;
        let encoded = encoder::encode(&entry.name, source.as_ref(), direction.target_mime());
        source.release();
        let encoded = encoded?;

        let derived = naming::replace_suffix(
            &entry.name,
            direction.source_suffix(),
            direction.target_suffix(),
        );
        let target = self.dir.join(&derived);
        fs::write(&target, &encoded).map_err(|err| ConvertError::Write {
            name: derived.clone(),
            source: err,
        })?;

        Ok((derived, encoded.len() as u64))
    }
}
