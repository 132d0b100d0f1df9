//! Legacy vector image conversion cascade.
//!
//! WMF/EMF payloads are converted to a raster format through an ordered
//! strategy chain, cheapest and most portable first: the in-process
//! codec, the ImageMagick CLI, the LibreOffice headless CLI, and
//! finally shape export through the interactive host application.
//! The first success wins; a strategy whose availability probe fails is
//! never run, and probes execute at most once per run. Exhaustion
//! degrades the image to a placeholder instead of failing the job.

use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::ImageFormat;
use once_cell::sync::OnceCell;

use crate::error::{Error, Result};
use crate::model::Bounds;
use crate::parser::{HostAutomation, PayloadDigest};

/// Target raster format for converted images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    /// PNG output
    #[default]
    Png,
    /// JPEG output
    Jpeg,
}

impl RasterFormat {
    /// File extension without the dot.
    pub fn ext(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Tuning knobs for the cascade, applied uniformly across strategies
/// where applicable. Defaults mirror the original tool's
/// environment-variable defaults.
#[derive(Debug, Clone)]
pub struct CascadeOptions {
    /// Slide export width in pixels for the host strategy
    pub export_width: u32,

    /// Density passed to external rasterizers
    pub dpi: u32,

    /// Output raster format
    pub format: RasterFormat,

    /// JPEG quality (ignored for PNG)
    pub quality: u8,

    /// Allow the final host-application strategy
    pub enable_host_export: bool,

    /// Upper bound for each external tool invocation
    pub timeout: Duration,
}

impl CascadeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host export width in pixels.
    pub fn with_export_width(mut self, width: u32) -> Self {
        self.export_width = width;
        self
    }

    /// Set the rasterization density.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the output raster format.
    pub fn with_format(mut self, format: RasterFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the JPEG quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Enable or disable the host-application fallback strategy.
    pub fn with_host_export(mut self, enable: bool) -> Self {
        self.enable_host_export = enable;
        self
    }

    /// Set the external tool timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for CascadeOptions {
    fn default() -> Self {
        Self {
            export_width: 3840,
            dpi: 600,
            format: RasterFormat::Png,
            quality: 92,
            enable_host_export: true,
            timeout: Duration::from_secs(15),
        }
    }
}

/// Export parameters handed to [`HostAutomation::export_shape_raster`].
#[derive(Debug, Clone, Copy)]
pub struct RasterExportOptions {
    /// Export width in pixels
    pub width_px: u32,
    /// Output format
    pub format: RasterFormat,
    /// JPEG quality
    pub quality: u8,
}

/// One conversion request.
#[derive(Debug, Clone, Copy)]
pub struct RasterRequest<'a> {
    /// Raw legacy image payload
    pub payload: &'a [u8],

    /// Payload identity for the per-run cache
    pub digest: PayloadDigest,

    /// Slide the shape lives on (1-based), for host export
    pub slide_index: u32,

    /// Shape bounds in slide points, for host export cropping
    pub bounds: Bounds,
}

/// Outcome of the cascade for one payload.
#[derive(Debug, Clone)]
pub enum CascadeOutcome {
    /// A strategy produced raster bytes.
    Converted {
        /// Output format
        format: RasterFormat,
        /// Raster bytes
        bytes: Vec<u8>,
        /// Name of the strategy that succeeded
        strategy: &'static str,
    },
    /// Every available strategy failed.
    Exhausted,
}

/// A single conversion strategy.
pub trait RasterStrategy {
    /// Short strategy name for logs and instrumentation.
    fn name(&self) -> &'static str;

    /// Probe whether this strategy's preconditions hold. Called at
    /// most once per run; the cascade caches the answer.
    fn available(&self, options: &CascadeOptions) -> bool;

    /// Attempt the conversion.
    fn convert(&self, request: &RasterRequest<'_>, options: &CascadeOptions) -> Result<Vec<u8>>;
}

/// The ordered strategy chain with probe and result caches.
pub struct ImageCascade {
    strategies: Vec<Box<dyn RasterStrategy>>,
    probes: Vec<OnceCell<bool>>,
    cache: HashMap<PayloadDigest, CascadeOutcome>,
    options: CascadeOptions,
}

impl ImageCascade {
    /// Create the default chain: codec, magick, soffice, host export.
    pub fn new(options: CascadeOptions, host: Option<Arc<dyn HostAutomation>>) -> Self {
        let strategies: Vec<Box<dyn RasterStrategy>> = vec![
            Box::new(CodecStrategy),
            Box::new(MagickStrategy),
            Box::new(SofficeStrategy),
            Box::new(HostExportStrategy { host }),
        ];
        Self::with_strategies(strategies, options)
    }

    /// Create a cascade over an explicit strategy chain.
    pub fn with_strategies(
        strategies: Vec<Box<dyn RasterStrategy>>,
        options: CascadeOptions,
    ) -> Self {
        let probes = strategies.iter().map(|_| OnceCell::new()).collect();
        Self {
            strategies,
            probes,
            cache: HashMap::new(),
            options,
        }
    }

    /// Active cascade options.
    pub fn options(&self) -> &CascadeOptions {
        &self.options
    }

    /// Run the cascade for one payload, first success wins.
    pub fn convert(&mut self, request: &RasterRequest<'_>) -> CascadeOutcome {
        if let Some(hit) = self.cache.get(&request.digest) {
            return hit.clone();
        }

        let mut outcome = CascadeOutcome::Exhausted;
        for (i, strategy) in self.strategies.iter().enumerate() {
            let available = *self.probes[i].get_or_init(|| strategy.available(&self.options));
            if !available {
                continue;
            }
            match strategy.convert(request, &self.options) {
                Ok(bytes) => {
                    log::debug!(
                        "converted {}-byte legacy image via {}",
                        request.payload.len(),
                        strategy.name()
                    );
                    outcome = CascadeOutcome::Converted {
                        format: self.options.format,
                        bytes,
                        strategy: strategy.name(),
                    };
                    break;
                }
                Err(e) => {
                    log::debug!("raster strategy {} failed: {}", strategy.name(), e);
                }
            }
        }

        if matches!(outcome, CascadeOutcome::Exhausted) {
            log::warn!(
                "no strategy converted legacy image {} on slide {}, keeping placeholder",
                request.digest.to_hex(),
                request.slide_index
            );
        }

        self.cache.insert(request.digest, outcome.clone());
        outcome
    }
}

// ---------------------------------------------------------------------------
// Strategy 1: in-process codec
// ---------------------------------------------------------------------------

struct CodecStrategy;

impl RasterStrategy for CodecStrategy {
    fn name(&self) -> &'static str {
        "codec"
    }

    fn available(&self, _options: &CascadeOptions) -> bool {
        true
    }

    fn convert(&self, request: &RasterRequest<'_>, options: &CascadeOptions) -> Result<Vec<u8>> {
        let decoded = image::load_from_memory(request.payload)
            .map_err(|e| Error::Other(format!("codec decode failed: {}", e)))?;
        let mut out = std::io::Cursor::new(Vec::new());
        decoded
            .write_to(&mut out, options.format.image_format())
            .map_err(|e| Error::Other(format!("codec encode failed: {}", e)))?;
        Ok(out.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Strategy 2: ImageMagick CLI
// ---------------------------------------------------------------------------

struct MagickStrategy;

impl RasterStrategy for MagickStrategy {
    fn name(&self) -> &'static str {
        "magick"
    }

    fn available(&self, _options: &CascadeOptions) -> bool {
        probe_binary("magick", &["-version"])
    }

    fn convert(&self, request: &RasterRequest<'_>, options: &CascadeOptions) -> Result<Vec<u8>> {
        let input = write_payload_temp(request.payload, ".wmf")?;
        let output = tempfile::Builder::new()
            .prefix("undeck-raster")
            .suffix(&format!(".{}", options.format.ext()))
            .tempfile()?;

        let mut cmd = Command::new("magick");
        cmd.arg("-density")
            .arg(options.dpi.to_string())
            .arg(input.path())
            .arg("-background")
            .arg("white")
            .arg("-alpha")
            .arg("remove")
            .arg("-alpha")
            .arg("off");
        if options.format == RasterFormat::Jpeg {
            cmd.arg("-quality").arg(options.quality.to_string());
        }
        cmd.arg(output.path());

        run_with_timeout(cmd, options.timeout, self.name())?;
        read_nonempty(output.path())
    }
}

// ---------------------------------------------------------------------------
// Strategy 3: LibreOffice headless CLI
// ---------------------------------------------------------------------------

struct SofficeStrategy;

impl RasterStrategy for SofficeStrategy {
    fn name(&self) -> &'static str {
        "soffice"
    }

    fn available(&self, _options: &CascadeOptions) -> bool {
        probe_binary("soffice", &["--version"])
    }

    fn convert(&self, request: &RasterRequest<'_>, options: &CascadeOptions) -> Result<Vec<u8>> {
        let dir = tempfile::tempdir()?;
        let input_path = dir.path().join("payload.wmf");
        std::fs::write(&input_path, request.payload)?;

        let mut cmd = Command::new("soffice");
        cmd.arg("--headless")
            .arg("--convert-to")
            .arg(options.format.ext())
            .arg("--outdir")
            .arg(dir.path())
            .arg(&input_path);

        run_with_timeout(cmd, options.timeout, self.name())?;

        let converted = dir.path().join(format!("payload.{}", options.format.ext()));
        read_nonempty(&converted)
    }
}

// ---------------------------------------------------------------------------
// Strategy 4: host application export
// ---------------------------------------------------------------------------

struct HostExportStrategy {
    host: Option<Arc<dyn HostAutomation>>,
}

impl RasterStrategy for HostExportStrategy {
    fn name(&self) -> &'static str {
        "host-export"
    }

    fn available(&self, options: &CascadeOptions) -> bool {
        options.enable_host_export && self.host.is_some()
    }

    fn convert(&self, request: &RasterRequest<'_>, options: &CascadeOptions) -> Result<Vec<u8>> {
        let host = self
            .host
            .as_ref()
            .ok_or_else(|| Error::HostUnavailable("no host attached".into()))?;
        host.export_shape_raster(
            request.slide_index,
            request.bounds,
            &RasterExportOptions {
                width_px: options.export_width,
                format: options.format,
                quality: options.quality,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Shared process plumbing
// ---------------------------------------------------------------------------

fn probe_binary(name: &str, args: &[&str]) -> bool {
    Command::new(name)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn write_payload_temp(payload: &[u8], suffix: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("undeck-raster")
        .suffix(suffix)
        .tempfile()?;
    file.write_all(payload)?;
    file.flush()?;
    Ok(file)
}

/// Run a command, killing it when the timeout elapses. A timed-out
/// strategy is a plain failure; pipeline state is untouched.
fn run_with_timeout(mut cmd: Command, timeout: Duration, context: &str) -> Result<()> {
    let mut child = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(Error::Io)?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(status) if status.success() => return Ok(()),
            Some(status) => {
                return Err(Error::Other(format!(
                    "{} exited with status {}",
                    context, status
                )))
            }
            None => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::ToolTimeout(context.to_string()));
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

fn read_nonempty(path: &std::path::Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(Error::Other(format!("{} produced an empty file", path.display())));
    }
    Ok(bytes)
}
