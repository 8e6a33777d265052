//! Host-side persistence helpers for layout passes.
//!
//! The engine itself is pure; callers that want to skip re-layout across
//! process runs can persist results here, keyed by a deterministic profile
//! id over the source text and configuration. All store operations fail
//! soft: I/O, decode, and size-cap problems surface as `None`/no-op, never
//! as errors inside a layout pass.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::layout_engine::LayoutConfig;
use crate::layout_ir::{JustifyMode, LayoutResult, LineLayout, ParagraphLayout, PlacedToken};

const CACHE_SCHEMA_VERSION: u8 = 1;
const DEFAULT_MAX_CACHE_FILE_BYTES: usize = 1024 * 1024;
static CACHE_WRITE_NONCE: AtomicUsize = AtomicUsize::new(0);

/// Stable layout profile id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutProfileId(pub [u8; 32]);

impl LayoutProfileId {
    /// Build a deterministic profile id from arbitrary payload bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        fn fnv64(seed: u64, payload: &[u8]) -> u64 {
            let mut hash = seed;
            for b in payload {
                hash ^= *b as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            hash
        }
        const SEEDS: [u64; 4] = [
            0xcbf29ce484222325,
            0x9e3779b97f4a7c15,
            0xd6e8feb86659fd93,
            0xa0761d6478bd642f,
        ];
        let mut out = [0u8; 32];
        for (i, seed) in SEEDS.iter().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&fnv64(*seed, bytes).to_le_bytes());
        }
        Self(out)
    }

    /// Profile id covering one layout pass: source text plus every
    /// geometry/style/alignment input the pass depends on.
    pub fn for_pass(text: &str, cfg: &LayoutConfig) -> Self {
        let mut payload = Vec::with_capacity(text.len() + 96);
        for value in [
            cfg.box_width_px,
            cfg.padding_start_px,
            cfg.padding_end_px,
            cfg.padding_top_px,
            cfg.padding_bottom_px,
            cfg.line_height_px,
            cfg.line_spacing_px,
            cfg.paragraph_spacing_px,
        ] {
            payload.extend_from_slice(&value.to_le_bytes());
        }
        payload.extend_from_slice(cfg.style.family.as_bytes());
        payload.extend_from_slice(&cfg.style.weight.to_le_bytes());
        payload.push(cfg.style.italic as u8);
        for value in [
            cfg.style.size_px,
            cfg.style.line_height,
            cfg.style.letter_spacing,
        ] {
            payload.extend_from_slice(&value.to_bits().to_le_bytes());
        }
        payload.push(cfg.layout_direction as u8);
        payload.push(cfg.gravity as u8);
        payload.push(cfg.text_alignment as u8);
        for value in [
            cfg.hyphenation.min_word_chars,
            cfg.hyphenation.min_head_chars,
            cfg.hyphenation.min_tail_chars,
        ] {
            payload.extend_from_slice(&(value as u64).to_le_bytes());
        }
        payload.extend_from_slice(text.as_bytes());
        Self::from_bytes(&payload)
    }
}

/// Storage hooks for layout caches.
pub trait LayoutCacheStore {
    /// Load a cached layout for `profile`, if available.
    fn load_layout(&self, _profile: LayoutProfileId) -> Option<LayoutResult> {
        None
    }

    /// Persist a layout for `profile`.
    fn store_layout(&self, _profile: LayoutProfileId, _layout: &LayoutResult) {}
}

/// File-backed layout cache store.
///
/// Cache paths are deterministic by profile: `<root>/<profile-hex>/layout.json`.
/// Payloads use a JSON envelope with a schema version, and `max_file_bytes`
/// is enforced on both reads and writes. Failures are silent no-ops.
#[derive(Clone, Debug)]
pub struct FileLayoutCacheStore {
    root: PathBuf,
    max_file_bytes: usize,
}

impl FileLayoutCacheStore {
    /// Create a new cache store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_bytes: DEFAULT_MAX_CACHE_FILE_BYTES,
        }
    }

    /// Set the maximum allowed cache file size in bytes.
    ///
    /// Values of `0` are treated as `1` to keep the cap explicit.
    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes.max(1);
        self
    }

    /// Root directory for cache files.
    pub fn cache_root(&self) -> &Path {
        &self.root
    }

    /// Maximum allowed cache file size in bytes.
    pub fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Deterministic cache path for a profile.
    pub fn layout_cache_path(&self, profile: LayoutProfileId) -> PathBuf {
        self.root.join(profile_hex(profile)).join("layout.json")
    }
}

impl LayoutCacheStore for FileLayoutCacheStore {
    fn load_layout(&self, profile: LayoutProfileId) -> Option<LayoutResult> {
        let path = self.layout_cache_path(profile);
        let max_file_bytes = self.max_file_bytes as u64;
        if fs::metadata(&path).ok()?.len() > max_file_bytes {
            return None;
        }

        let file = File::open(path).ok()?;
        let mut reader = file.take(max_file_bytes.saturating_add(1));
        let mut payload = Vec::with_capacity(8);
        if reader.read_to_end(&mut payload).is_err() {
            return None;
        }
        if payload.len() > self.max_file_bytes {
            return None;
        }
        let envelope: PersistedLayoutEnvelope = serde_json::from_slice(&payload).ok()?;
        envelope.into_layout_result()
    }

    fn store_layout(&self, profile: LayoutProfileId, layout: &LayoutResult) {
        let final_path = self.layout_cache_path(profile);
        let Some(parent) = final_path.parent() else {
            return;
        };
        if fs::create_dir_all(parent).is_err() {
            return;
        }

        let nonce = CACHE_WRITE_NONCE.fetch_add(1, Ordering::Relaxed);
        let temp_path = parent.join(format!(
            "layout.json.tmp-{}-{}",
            std::process::id(),
            nonce
        ));

        let envelope = PersistedLayoutEnvelope::from_layout(layout);
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
        {
            Ok(file) => file,
            Err(_) => return,
        };
        let writer = BufWriter::new(file);
        let mut writer = CappedWriter::new(writer, self.max_file_bytes);
        if serde_json::to_writer(&mut writer, &envelope).is_err() {
            remove_file_quiet(&temp_path);
            return;
        }
        if writer.flush().is_err() {
            remove_file_quiet(&temp_path);
            return;
        }
        let mut writer = writer.into_inner();
        if writer.flush().is_err() {
            remove_file_quiet(&temp_path);
            return;
        }
        let file = match writer.into_inner() {
            Ok(file) => file,
            Err(_) => {
                remove_file_quiet(&temp_path);
                return;
            }
        };
        if file.sync_all().is_err() {
            remove_file_quiet(&temp_path);
            return;
        }
        drop(file);
        if fs::rename(&temp_path, &final_path).is_err() {
            remove_file_quiet(&temp_path);
            return;
        }
        sync_directory(parent);
    }
}

fn profile_hex(profile: LayoutProfileId) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(64);
    for byte in profile.0 {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

fn remove_file_quiet(path: &Path) {
    let _ = fs::remove_file(path);
}

fn sync_directory(path: &Path) {
    if let Ok(dir) = File::open(path) {
        let _ = dir.sync_all();
    }
}

struct CappedWriter<W> {
    inner: W,
    max_bytes: usize,
    written: usize,
}

impl<W> CappedWriter<W> {
    fn new(inner: W, max_bytes: usize) -> Self {
        Self {
            inner,
            max_bytes: max_bytes.max(1),
            written: 0,
        }
    }

    fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CappedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = self.max_bytes.saturating_sub(self.written);
        if buf.len() > remaining {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "cache file exceeds max_file_bytes",
            ));
        }
        self.inner.write_all(buf)?;
        self.written = self.written.saturating_add(buf.len());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PersistedLayoutEnvelope {
    version: u8,
    layout: PersistedLayoutResult,
}

impl PersistedLayoutEnvelope {
    fn from_layout(layout: &LayoutResult) -> Self {
        Self {
            version: CACHE_SCHEMA_VERSION,
            layout: layout.into(),
        }
    }

    fn into_layout_result(self) -> Option<LayoutResult> {
        if self.version != CACHE_SCHEMA_VERSION {
            return None;
        }
        Some(self.layout.into())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PersistedLayoutResult {
    paragraphs: Vec<PersistedParagraphLayout>,
    total_line_count: usize,
    total_height_px: i32,
    content_width_px: i32,
}

impl From<&LayoutResult> for PersistedLayoutResult {
    fn from(value: &LayoutResult) -> Self {
        Self {
            paragraphs: value.paragraphs.iter().map(Into::into).collect(),
            total_line_count: value.total_line_count,
            total_height_px: value.total_height_px,
            content_width_px: value.content_width_px,
        }
    }
}

impl From<PersistedLayoutResult> for LayoutResult {
    fn from(value: PersistedLayoutResult) -> Self {
        Self {
            paragraphs: value.paragraphs.into_iter().map(Into::into).collect(),
            total_line_count: value.total_line_count,
            total_height_px: value.total_height_px,
            content_width_px: value.content_width_px,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PersistedParagraphLayout {
    lines: Vec<PersistedLineLayout>,
}

impl From<&ParagraphLayout> for PersistedParagraphLayout {
    fn from(value: &ParagraphLayout) -> Self {
        Self {
            lines: value.lines.iter().map(Into::into).collect(),
        }
    }
}

impl From<PersistedParagraphLayout> for ParagraphLayout {
    fn from(value: PersistedParagraphLayout) -> Self {
        Self {
            lines: value.lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PersistedLineLayout {
    placements: Vec<PersistedPlacedToken>,
    natural_width_px: f32,
    justify: PersistedJustifyMode,
}

impl From<&LineLayout> for PersistedLineLayout {
    fn from(value: &LineLayout) -> Self {
        Self {
            placements: value.placements.iter().map(Into::into).collect(),
            natural_width_px: value.natural_width_px,
            justify: value.justify.into(),
        }
    }
}

impl From<PersistedLineLayout> for LineLayout {
    fn from(value: PersistedLineLayout) -> Self {
        Self {
            placements: value.placements.into_iter().map(Into::into).collect(),
            natural_width_px: value.natural_width_px,
            justify: value.justify.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PersistedPlacedToken {
    text: String,
    x_px: f32,
    width_px: f32,
}

impl From<&PlacedToken> for PersistedPlacedToken {
    fn from(value: &PlacedToken) -> Self {
        Self {
            text: value.text.clone(),
            x_px: value.x_px,
            width_px: value.width_px,
        }
    }
}

impl From<PersistedPlacedToken> for PlacedToken {
    fn from(value: PersistedPlacedToken) -> Self {
        Self {
            text: value.text,
            x_px: value.x_px,
            width_px: value.width_px,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
enum PersistedJustifyMode {
    Stretch { gap_px: f32 },
    AlignStart { offset_px: f32 },
    AlignEnd { offset_px: f32 },
    AlignCenter { offset_px: f32 },
}

impl From<JustifyMode> for PersistedJustifyMode {
    fn from(value: JustifyMode) -> Self {
        match value {
            JustifyMode::Stretch { gap_px } => Self::Stretch { gap_px },
            JustifyMode::AlignStart { offset_px } => Self::AlignStart { offset_px },
            JustifyMode::AlignEnd { offset_px } => Self::AlignEnd { offset_px },
            JustifyMode::AlignCenter { offset_px } => Self::AlignCenter { offset_px },
        }
    }
}

impl From<PersistedJustifyMode> for JustifyMode {
    fn from(value: PersistedJustifyMode) -> Self {
        match value {
            PersistedJustifyMode::Stretch { gap_px } => Self::Stretch { gap_px },
            PersistedJustifyMode::AlignStart { offset_px } => Self::AlignStart { offset_px },
            PersistedJustifyMode::AlignEnd { offset_px } => Self::AlignEnd { offset_px },
            PersistedJustifyMode::AlignCenter { offset_px } => Self::AlignCenter { offset_px },
        }
    }
}
