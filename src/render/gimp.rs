//! Headless GIMP 3 backend.
//!
//! Drives GIMP in batch mode: every operation writes a generated Python-Fu
//! script to a temp file and runs
//! `gimp -i --batch-interpreter python-fu-eval -b 'exec(...)' --quit`.
//!
//! ## Binary discovery and display handling
//!
//! `gimp-console` is preferred over `gimp` when both are on `PATH`. GIMP
//! still wants a display server even in batch mode on some setups, so the
//! command is wrapped in `xvfb-run -a` when available; otherwise
//! `--no-interface` is added when `DISPLAY` is unset. Failures whose output
//! mentions the display get a setup hint appended to the diagnostic.
//!
//! ## Version gate
//!
//! GIMP 2.x batch scripting is a different world (Script-Fu `pdb` calls,
//! incompatible Python API) and is not supported: the first operation runs
//! `gimp --version` and refuses anything below 3.0. The result is cached for
//! the lifetime of the backend.

use super::backend::{BackendError, Dimensions, RenderBackend, RenderedArtifacts};
use super::script::{self, MANIFEST_BEGIN, MANIFEST_END};
use crate::plan::PopulationPlan;
use crate::template::{Layer, LayerGeometry, LayerKind, TemplateManifest};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{LazyLock, OnceLock};
use std::time::{Duration, Instant};

/// Default per-invocation timeout. Template loads are normally seconds;
/// a minute means something is wedged, not slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)").unwrap());

/// Search `PATH` for an executable file with this name.
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn parse_version(text: &str) -> Option<(u32, u32)> {
    let caps = VERSION_RE.captures(text)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Layer entry as emitted by the manifest probe script.
#[derive(Debug, Deserialize)]
struct ProbeLayer {
    name: String,
    kind: String,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

/// Cut the JSON payload out of the probe's stdout.
fn extract_manifest_json(stdout: &str) -> Option<&str> {
    let start = stdout.find(MANIFEST_BEGIN)? + MANIFEST_BEGIN.len();
    let end = start + stdout[start..].find(MANIFEST_END)?;
    Some(stdout[start..end].trim())
}

/// Parse the probe output into a manifest.
///
/// Geometry is kept for image-kind layers only — that is where it means
/// something (photo placement); text layers are addressed purely by name.
fn manifest_from_probe_output(stdout: &str) -> Result<TemplateManifest, BackendError> {
    let json = extract_manifest_json(stdout).ok_or_else(|| {
        BackendError::ManifestParse("probe output contains no manifest markers".to_string())
    })?;
    let probed: Vec<ProbeLayer> =
        serde_json::from_str(json).map_err(|e| BackendError::ManifestParse(e.to_string()))?;

    let layers = probed
        .into_iter()
        .map(|p| {
            let kind = match p.kind.as_str() {
                "text" => LayerKind::Text,
                "image" => LayerKind::Image,
                _ => LayerKind::Other,
            };
            let geometry = (kind == LayerKind::Image).then_some(LayerGeometry {
                x: p.x,
                y: p.y,
                width: p.width,
                height: p.height,
            });
            Layer {
                name: p.name,
                kind,
                geometry,
            }
        })
        .collect();

    Ok(TemplateManifest::new(layers)?)
}

/// Combine captured output into a failure diagnostic, with a display-server
/// hint when the output smells like a headless-setup problem.
fn diagnose(stdout: &str, stderr: &str) -> String {
    let mut log = String::new();
    if !stdout.is_empty() {
        log.push_str("=== STDOUT ===\n");
        log.push_str(stdout);
    }
    if !stderr.is_empty() {
        if !log.is_empty() {
            log.push('\n');
        }
        log.push_str("=== STDERR ===\n");
        log.push_str(stderr);
    }
    if log.is_empty() {
        log.push_str("no output from GIMP");
    }

    let lower = log.to_lowercase();
    if lower.contains("display") || lower.contains("gdk_display") {
        log.push_str(
            "\n\nGIMP needs a display server to run. If this machine is headless, \
             install xvfb (the command is wrapped in xvfb-run automatically when \
             present) or set the DISPLAY environment variable.",
        );
    }
    log
}

struct BatchOutput {
    ok: bool,
    stdout: String,
    stderr: String,
}

/// Production backend: headless GIMP 3 via generated batch scripts.
pub struct GimpBackend {
    binary: PathBuf,
    timeout: Duration,
    version: OnceLock<(u32, u32)>,
}

impl GimpBackend {
    pub fn new() -> Self {
        Self::with_settings(None, DEFAULT_TIMEOUT_SECS)
    }

    /// Override the GIMP binary and/or the per-invocation timeout.
    pub fn with_settings(binary: Option<PathBuf>, timeout_secs: u64) -> Self {
        let binary = binary.unwrap_or_else(|| {
            find_in_path("gimp-console").unwrap_or_else(|| PathBuf::from("gimp"))
        });
        Self {
            binary,
            timeout: Duration::from_secs(timeout_secs),
            version: OnceLock::new(),
        }
    }

    fn ensure_supported_version(&self) -> Result<(), BackendError> {
        if self.version.get().is_some() {
            return Ok(());
        }

        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| {
                BackendError::UnsupportedEngine(format!(
                    "could not run {} --version: {e}",
                    self.binary.display()
                ))
            })?;
        let text = String::from_utf8_lossy(&output.stdout);
        let (major, minor) = parse_version(&text).ok_or_else(|| {
            BackendError::UnsupportedEngine("version detection failed".to_string())
        })?;
        if major < 3 {
            return Err(BackendError::UnsupportedEngine(format!(
                "found GIMP {major}.{minor}"
            )));
        }
        let _ = self.version.set((major, minor));
        Ok(())
    }

    fn batch_command(&self, script_path: &Path) -> Command {
        let batch = format!("exec(open(\"{}\").read())", script_path.display());
        let gimp_args = [
            "-i",
            "--batch-interpreter",
            "python-fu-eval",
            "-b",
            batch.as_str(),
            "--quit",
        ];

        if let Some(xvfb) = find_in_path("xvfb-run") {
            let mut cmd = Command::new(xvfb);
            cmd.arg("-a").arg(&self.binary).args(gimp_args);
            cmd
        } else {
            let mut cmd = Command::new(&self.binary);
            if env::var_os("DISPLAY").is_none() {
                cmd.arg("--no-interface");
            }
            cmd.args(gimp_args);
            cmd
        }
    }

    /// Write the script to a temp file, run GIMP on it, capture output.
    fn run_batch(&self, script_src: &str) -> Result<BatchOutput, BackendError> {
        self.ensure_supported_version()?;

        let mut script_file = tempfile::Builder::new()
            .prefix("bannersmith-")
            .suffix(".py")
            .tempfile()?;
        script_file.write_all(script_src.as_bytes())?;
        script_file.flush()?;

        let mut cmd = self.batch_command(script_file.path());
        debug!("running {cmd:?}");

        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let stdout_reader = drain(child.stdout.take());
        let stderr_reader = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BackendError::Timeout(self.timeout.as_secs()));
                }
                None => std::thread::sleep(Duration::from_millis(100)),
            }
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();
        debug!("gimp exited with {status}; {} stdout bytes", stdout.len());

        // GIMP complains that batch commands "returned no return values" and
        // exits non-zero even when the script ran fine; that is not a failure.
        let ok = status.success() || stderr.contains("returned no return values");

        Ok(BatchOutput { ok, stdout, stderr })
    }
}

impl Default for GimpBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect a child stream on a thread so the pipe never fills up while the
/// main thread polls for exit.
fn drain<R: Read + Send + 'static>(reader: Option<R>) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut reader) = reader {
            let _ = reader.read_to_string(&mut buf);
        }
        buf
    })
}

impl RenderBackend for GimpBackend {
    fn read_manifest(&self, template: &Path) -> Result<TemplateManifest, BackendError> {
        let output = self.run_batch(&script::manifest_probe_script(template))?;
        if !output.ok {
            return Err(BackendError::EngineFailed(diagnose(
                &output.stdout,
                &output.stderr,
            )));
        }
        manifest_from_probe_output(&output.stdout)
    }

    fn photo_dimensions(&self, photo: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) =
            image::image_dimensions(photo).map_err(|e| BackendError::Photo(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn render(
        &self,
        template: &Path,
        plan: &PopulationPlan,
    ) -> Result<RenderedArtifacts, BackendError> {
        let output = self.run_batch(&script::population_script(template, plan))?;
        if !output.ok {
            return Err(BackendError::EngineFailed(diagnose(
                &output.stdout,
                &output.stderr,
            )));
        }
        Ok(RenderedArtifacts {
            editable: plan.editable_path(),
            raster: plan.raster_path(),
        })
    }

    fn open_editor(&self, artifact: &Path) -> Result<(), BackendError> {
        // The interactive editor is always plain `gimp`; gimp-console has no UI.
        let editor = find_in_path("gimp").unwrap_or_else(|| PathBuf::from("gimp"));
        Command::new(editor)
            .arg(artifact)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}
