use std::io::{BufRead as _, BufReader, Read as _, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use base64::Engine as _;

use crate::config::PipelineConfig;
use crate::foundation::core::Resolution;
use crate::foundation::error::{TurntableError, TurntableResult};
use crate::material::MaterialPreset;
use crate::model::ModelAsset;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::scene::{SceneRecipe, rotation_radians};

/// Options for [`BridgeBackend`].
#[derive(Clone, Debug)]
pub struct BridgeOpts {
    /// Renderer program to spawn.
    pub program: PathBuf,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Requested frame size.
    pub resolution: Resolution,
}

impl BridgeOpts {
    /// Take the renderer settings and frame size from a pipeline configuration.
    pub fn from_config(cfg: &PipelineConfig) -> Self {
        Self {
            program: cfg.renderer.program.clone(),
            args: cfg.renderer.args.clone(),
            resolution: cfg.resolution,
        }
    }
}

/// Messages written to the renderer's stdin, one JSON object per line.
#[derive(Debug, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub(crate) enum BridgeRequest<'a> {
    Init {
        width: u32,
        height: u32,
    },
    Render {
        id: u64,
        model: &'a str,
        scene: &'a SceneRecipe,
        rotation_y_rad: f64,
    },
    Close,
}

/// One line read from the renderer's stdout.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct BridgeResponse {
    #[serde(default)]
    pub(crate) id: Option<u64>,
    pub(crate) ok: bool,
    #[serde(default)]
    pub(crate) ready: bool,
    #[serde(default)]
    pub(crate) png_base64: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

struct BridgeProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    model_name: String,
    model_uri: String,
    next_id: u64,
}

impl BridgeProcess {
    fn send(&mut self, req: &BridgeRequest<'_>) -> TurntableResult<()> {
        let mut line = serde_json::to_vec(req)
            .map_err(|e| TurntableError::serde(format!("encode bridge request: {e}")))?;
        line.push(b'\n');
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TurntableError::session("renderer stdin is already closed"));
        };
        // Pipe errors end the session.
        stdin
            .write_all(&line)
            .and_then(|()| stdin.flush())
            .map_err(|e| TurntableError::session(format!("write to renderer stdin: {e}")))
    }

    fn recv(&mut self) -> TurntableResult<BridgeResponse> {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self
                .stdout
                .read_line(&mut line)
                .map_err(|e| TurntableError::session(format!("read renderer stdout: {e}")))?;
            if n == 0 {
                return Err(TurntableError::session(
                    "renderer closed its output unexpectedly",
                ));
            }
            if is_response_line(&line) {
                break;
            }
            if !line.trim().is_empty() {
                tracing::debug!(line = line.trim(), "ignoring renderer output");
            }
        }
        parse_response(&line)
    }

    /// Read the response to request `id`, dropping late answers to earlier requests.
    fn recv_for(&mut self, id: u64) -> TurntableResult<BridgeResponse> {
        loop {
            let resp = self.recv()?;
            match resp.id {
                Some(seen) if seen < id => {
                    tracing::debug!(seen, expected = id, "dropping stale renderer response");
                }
                _ => return Ok(resp),
            }
        }
    }

    /// Close stdin, wait for exit and collect stderr.
    fn shutdown(mut self) -> TurntableResult<()> {
        if self.stdin.is_some() {
            // Best effort: the renderer may already be gone.
            let _ = self.send(&BridgeRequest::Close);
        }
        drop(self.stdin.take());

        let status = self
            .child
            .wait()
            .map_err(|e| TurntableError::session(format!("wait for renderer to exit: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TurntableError::session("renderer stderr drain thread panicked"))?
                .map_err(|e| TurntableError::session(format!("renderer stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(TurntableError::session(format!(
                "renderer exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn kill(mut self) {
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Render backend that drives an external headless renderer over a line-based JSON bridge.
///
/// One renderer process is spawned per sequence. The protocol on the child's stdin/stdout:
///
/// - `{"op":"init","width":W,"height":H}` answered by `{"ok":true,"ready":true}` once the
///   renderer has loaded its scene library.
/// - `{"op":"render","id":N,"model":"data:model/gltf-binary;base64,...","scene":{...},
///   "rotation_y_rad":R}` answered by `{"id":N,"ok":true,"png_base64":"..."}` or
///   `{"id":N,"ok":false,"error":"..."}`.
/// - `{"op":"close"}` after which the renderer exits.
///
/// The renderer's stderr is drained on a helper thread and reported if it exits abnormally.
pub struct BridgeBackend {
    opts: BridgeOpts,
    process: Option<BridgeProcess>,
}

impl BridgeBackend {
    /// Create a backend. Nothing is spawned until the first sequence begins.
    pub fn new(opts: BridgeOpts) -> Self {
        Self {
            opts,
            process: None,
        }
    }

    fn spawn(&self, model: &ModelAsset) -> TurntableResult<BridgeProcess> {
        let mut cmd = Command::new(&self.opts.program);
        cmd.args(&self.opts.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            let program = self.opts.program.display();
            if e.kind() == std::io::ErrorKind::NotFound {
                TurntableError::backend_unavailable(format!(
                    "renderer '{program}' was not found (is it installed and on PATH?)"
                ))
            } else {
                TurntableError::session(format!("failed to spawn renderer '{program}': {e}"))
            }
        })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (Some(stdin), Some(stdout), Some(mut stderr)) = (stdin, stdout, stderr) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(TurntableError::session(
                "failed to open renderer stdio pipes (unexpected)",
            ));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(BridgeProcess {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
            stderr_drain: Some(stderr_drain),
            model_name: model.name.clone(),
            model_uri: model.to_data_uri(),
            next_id: 0,
        })
    }
}

impl RenderBackend for BridgeBackend {
    fn begin_sequence(
        &mut self,
        model: &ModelAsset,
        _material: &MaterialPreset,
    ) -> TurntableResult<()> {
        if let Some(stale) = self.process.take() {
            tracing::warn!(model = %stale.model_name, "previous renderer session was not closed");
            stale.kill();
        }

        let mut process = self.spawn(model)?;
        let handshake = process
            .send(&BridgeRequest::Init {
                width: self.opts.resolution.width,
                height: self.opts.resolution.height,
            })
            .and_then(|()| process.recv());

        match handshake {
            Ok(resp) if resp.ok && resp.ready => {
                tracing::debug!(model = %model.name, "renderer ready");
                self.process = Some(process);
                Ok(())
            }
            Ok(resp) => {
                process.kill();
                Err(TurntableError::session(format!(
                    "renderer did not report ready: {}",
                    resp.error.as_deref().unwrap_or("no error message")
                )))
            }
            Err(e) => {
                process.kill();
                Err(TurntableError::session(format!(
                    "renderer handshake failed: {e}"
                )))
            }
        }
    }

    fn render_frame(
        &mut self,
        model: &ModelAsset,
        material: &MaterialPreset,
        angle_deg: f64,
    ) -> TurntableResult<FrameRGBA> {
        let process = self
            .process
            .as_mut()
            .ok_or_else(|| TurntableError::session("renderer session not started"))?;
        if process.model_name != model.name {
            return Err(TurntableError::render(format!(
                "renderer session is bound to model '{}', not '{}'",
                process.model_name, model.name
            )));
        }

        let id = process.next_id;
        process.next_id += 1;

        let scene = SceneRecipe::for_material(material);
        let model_uri = std::mem::take(&mut process.model_uri);
        let sent = process.send(&BridgeRequest::Render {
            id,
            model: &model_uri,
            scene: &scene,
            rotation_y_rad: rotation_radians(angle_deg),
        });
        process.model_uri = model_uri;
        sent?;

        let resp = process.recv_for(id)?;
        frame_from_response(resp, id, self.opts.resolution)
    }

    fn end_sequence(&mut self) -> TurntableResult<()> {
        match self.process.take() {
            Some(process) => process.shutdown(),
            None => Ok(()),
        }
    }
}

impl Drop for BridgeBackend {
    fn drop(&mut self) {
        if let Some(process) = self.process.take() {
            process.kill();
        }
    }
}

/// Protocol messages are single-line JSON objects; anything else on stdout is renderer chatter.
pub(crate) fn is_response_line(line: &str) -> bool {
    line.trim_start().starts_with('{')
}

pub(crate) fn parse_response(line: &str) -> TurntableResult<BridgeResponse> {
    serde_json::from_str(line.trim()).map_err(|e| {
        TurntableError::serde(format!("invalid renderer response '{}': {e}", line.trim()))
    })
}

pub(crate) fn frame_from_response(
    resp: BridgeResponse,
    expected_id: u64,
    resolution: Resolution,
) -> TurntableResult<FrameRGBA> {
    if let Some(id) = resp.id
        && id != expected_id
    {
        return Err(TurntableError::render(format!(
            "renderer answered request {id}, expected {expected_id}"
        )));
    }
    if !resp.ok {
        return Err(TurntableError::render(
            resp.error
                .unwrap_or_else(|| "renderer reported failure without a message".to_string()),
        ));
    }
    let b64 = resp
        .png_base64
        .ok_or_else(|| TurntableError::render("renderer response has no png_base64"))?;
    let png = base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| TurntableError::render(format!("invalid base64 snapshot: {e}")))?;
    let frame = FrameRGBA::from_png(&png)?;
    if frame.resolution() != resolution {
        return Err(TurntableError::render(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, resolution.width, resolution.height
        )));
    }
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/render/bridge.rs"]
mod tests;
