//! Python bridge for TransQuest inference
//! Connects to a persistent Python daemon that hosts the model library

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::alignment::QualityLabel;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::inference::backend::{
    ModelDescriptor, ModelLoader, ModelOutput, QualityModel, SentencePair,
};
use crate::model::ModelKind;

/// Upper bound on a single response frame
const MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Request sent to the inference daemon
#[derive(Debug, Default, Serialize)]
pub struct BridgeRequest {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pairs: Vec<[String; 2]>,
}

impl BridgeRequest {
    fn command(command: &str) -> Self {
        Self {
            command: command.to_string(),
            ..Default::default()
        }
    }
}

/// Response from the inference daemon
#[derive(Debug, Default, Deserialize)]
pub struct BridgeResponse {
    pub status: Option<String>,
    pub error: Option<String>,
    pub scores: Option<Vec<f64>>,
    pub source_tags: Option<Vec<Vec<QualityLabel>>>,
    pub target_tags: Option<Vec<Vec<QualityLabel>>>,
    #[serde(default)]
    pub raw_outputs: serde_json::Value,
}

/// Write a length-prefixed frame (4-byte big-endian length, then payload)
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> std::io::Result<()> {
    let length = u32::try_from(payload.len())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "frame too large"))?;
    writer.write_all(&length.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()
}

/// Read one length-prefixed frame
pub fn read_frame<R: Read>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut length_buf = [0u8; 4];
    reader.read_exact(&mut length_buf)?;
    let length = u32::from_be_bytes(length_buf) as usize;
    if length > MAX_FRAME_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("frame of {} bytes exceeds limit", length),
        ));
    }

    let mut payload = vec![0u8; length];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

/// Bridge to the Python TransQuest runtime.
/// Talks to a persistent daemon; falls back to a one-shot script.
pub struct PythonBridge {
    socket_path: PathBuf,
    daemon_script_path: PathBuf,
    fallback_script_path: PathBuf,
    python_cmd: String,
    daemon_process: Mutex<Option<Child>>,
}

impl PythonBridge {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            socket_path: config.socket_path.clone(),
            daemon_script_path: config.daemon_script.clone(),
            fallback_script_path: config.inference_script.clone(),
            python_cmd: config.python_cmd.clone(),
            daemon_process: Mutex::new(None),
        }
    }

    /// Check if the daemon is running
    fn is_daemon_running(&self) -> bool {
        self.socket_path.exists() && self.connect_to_daemon().is_ok()
    }

    /// Start the daemon if not running
    pub fn ensure_daemon_running(&self) -> Result<()> {
        if self.is_daemon_running() {
            debug!("Inference daemon already running");
            return Ok(());
        }

        info!("Starting inference daemon...");

        let child = Command::new(&self.python_cmd)
            .arg(&self.daemon_script_path)
            .arg("--socket")
            .arg(&self.socket_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::InferenceError(format!("Failed to start daemon: {}", e)))?;

        {
            let mut guard = self
                .daemon_process
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = Some(child);
        }

        // Importing torch and transformers is slow; allow up to 60 seconds
        for i in 0..600 {
            std::thread::sleep(Duration::from_millis(100));
            if self.socket_path.exists() {
                if let Ok(mut stream) = self.connect_to_daemon() {
                    if self
                        .send_request(&mut stream, &BridgeRequest::command("check"))
                        .is_ok()
                    {
                        info!("Inference daemon started");
                        return Ok(());
                    }
                }
            }
            if i % 50 == 0 {
                debug!("Waiting for daemon to start... ({}s)", i / 10);
            }
        }

        Err(Error::InferenceError(
            "Daemon failed to start within 60 seconds".to_string(),
        ))
    }

    /// Ask the daemon to exit, reap the child this bridge spawned and
    /// remove the socket file
    pub fn shutdown(&self) {
        if let Ok(mut stream) = self.connect_to_daemon() {
            info!("Stopping inference daemon");
            if let Err(e) = self.send_request(&mut stream, &BridgeRequest::command("shutdown")) {
                debug!("Daemon did not acknowledge shutdown: {}", e);
            }
        }

        let child = self
            .daemon_process
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(mut child) = child {
            let deadline = Instant::now() + Duration::from_secs(2);
            while matches!(child.try_wait(), Ok(None)) && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(50));
            }
            let _ = child.kill();
            let _ = child.wait();
        }

        if self.socket_path.exists() {
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }

    /// Connect to the daemon socket
    fn connect_to_daemon(&self) -> Result<UnixStream> {
        let stream = UnixStream::connect(&self.socket_path)
            .map_err(|e| Error::InferenceError(format!("Failed to connect to daemon: {}", e)))?;

        stream.set_read_timeout(Some(Duration::from_secs(600))).ok();
        stream.set_write_timeout(Some(Duration::from_secs(30))).ok();

        Ok(stream)
    }

    /// Send request to daemon and receive response
    fn send_request(
        &self,
        stream: &mut UnixStream,
        request: &BridgeRequest,
    ) -> Result<BridgeResponse> {
        let request_json = serde_json::to_vec(request)?;

        write_frame(stream, &request_json)
            .map_err(|e| Error::InferenceError(format!("Failed to write request: {}", e)))?;

        let response_buf = read_frame(stream)
            .map_err(|e| Error::InferenceError(format!("Failed to read response: {}", e)))?;

        serde_json::from_slice(&response_buf).map_err(|e| {
            Error::InferenceError(format!(
                "Failed to parse response: {} - {}",
                e,
                String::from_utf8_lossy(&response_buf)
            ))
        })
    }

    /// Call daemon with request, with fallback to direct Python call
    fn call_daemon(&self, request: &BridgeRequest) -> Result<BridgeResponse> {
        if let Err(e) = self.ensure_daemon_running() {
            warn!("Failed to start daemon, falling back to direct call: {}", e);
            return self.call_python_direct(request);
        }

        match self.connect_to_daemon() {
            Ok(mut stream) => match self.send_request(&mut stream, request) {
                Ok(response) => Ok(response),
                Err(e) => {
                    warn!("Daemon request failed, falling back to direct call: {}", e);
                    self.call_python_direct(request)
                }
            },
            Err(e) => {
                warn!(
                    "Failed to connect to daemon, falling back to direct call: {}",
                    e
                );
                self.call_python_direct(request)
            }
        }
    }

    /// Fallback: run the inference script once over stdin/stdout
    fn call_python_direct(&self, request: &BridgeRequest) -> Result<BridgeResponse> {
        let request_json = serde_json::to_string(request)?;

        let mut child = Command::new(&self.python_cmd)
            .arg(&self.fallback_script_path)
            .arg("--once")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::InferenceError(format!("Failed to start Python: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(request_json.as_bytes())
                .map_err(|e| Error::InferenceError(format!("Failed to write to Python: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::InferenceError(format!("Python process failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::InferenceError(format!("Python error: {}", stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let json_str = stdout
            .lines()
            .find(|line| line.trim().starts_with('{'))
            .unwrap_or(&stdout);

        serde_json::from_str(json_str).map_err(|e| {
            Error::InferenceError(format!(
                "Failed to parse Python response: {} - {}",
                e, json_str
            ))
        })
    }

    /// Build the checkpoint inside the daemon so the first request is fast
    pub fn load_model(&self, descriptor: &ModelDescriptor) -> Result<()> {
        let request = BridgeRequest {
            command: "load".to_string(),
            model: Some(descriptor.clone()),
            pairs: Vec::new(),
        };

        let response = self.call_daemon(&request)?;
        if let Some(err) = response.error {
            return Err(Error::ModelLoadError(format!(
                "{}: {}",
                descriptor.model_path.display(),
                err
            )));
        }
        Ok(())
    }

    /// Run `predict` for a batch of pairs
    pub fn predict(
        &self,
        descriptor: &ModelDescriptor,
        pairs: &[SentencePair],
    ) -> Result<BridgeResponse> {
        let request = BridgeRequest {
            command: "predict".to_string(),
            model: Some(descriptor.clone()),
            pairs: pairs
                .iter()
                .map(|pair| [pair.source.clone(), pair.target.clone()])
                .collect(),
        };

        let response = self.call_daemon(&request)?;
        if let Some(err) = response.error {
            return Err(Error::InferenceError(format!("Python TransQuest error: {}", err)));
        }
        Ok(response)
    }
}

/// A checkpoint hosted by the Python daemon
pub struct PythonQualityModel {
    bridge: Arc<PythonBridge>,
    descriptor: ModelDescriptor,
}

impl PythonQualityModel {
    /// Ask the daemon to load the checkpoint and return a handle to it
    pub fn load(bridge: Arc<PythonBridge>, descriptor: ModelDescriptor) -> Result<Self> {
        info!(
            "Loading {} model ({}) from {:?}",
            descriptor.kind, descriptor.model_type, descriptor.model_path
        );
        bridge.load_model(&descriptor)?;
        Ok(Self { bridge, descriptor })
    }
}

impl QualityModel for PythonQualityModel {
    fn kind(&self) -> ModelKind {
        self.descriptor.kind
    }

    fn predict(&self, pairs: &[SentencePair]) -> Result<ModelOutput> {
        let response = self.bridge.predict(&self.descriptor, pairs)?;
        output_from_response(self.descriptor.kind, pairs.len(), response)
    }
}

/// Loads checkpoints into the shared Python daemon
pub struct PythonModelLoader {
    bridge: Arc<PythonBridge>,
}

impl PythonModelLoader {
    pub fn new(bridge: Arc<PythonBridge>) -> Self {
        Self { bridge }
    }
}

impl ModelLoader for PythonModelLoader {
    fn load(&self, descriptor: ModelDescriptor) -> Result<Arc<dyn QualityModel>> {
        let model = PythonQualityModel::load(self.bridge.clone(), descriptor)?;
        Ok(Arc::new(model))
    }
}

fn output_from_response(
    kind: ModelKind,
    expected: usize,
    response: BridgeResponse,
) -> Result<ModelOutput> {
    let output = match kind {
        ModelKind::Sentence => {
            let scores = response
                .scores
                .ok_or_else(|| Error::InferenceError("No scores in response".to_string()))?;
            if scores.len() != expected {
                return Err(Error::InferenceError(format!(
                    "Expected {} scores, got {}",
                    expected,
                    scores.len()
                )));
            }
            ModelOutput::Scores {
                scores,
                raw_outputs: response.raw_outputs,
            }
        }
        ModelKind::Word => {
            let (source_tags, target_tags) = response
                .source_tags
                .zip(response.target_tags)
                .ok_or_else(|| Error::InferenceError("No tags in response".to_string()))?;
            if source_tags.len() != expected || target_tags.len() != expected {
                return Err(Error::InferenceError(format!(
                    "Expected tags for {} pairs, got {} source / {} target",
                    expected,
                    source_tags.len(),
                    target_tags.len()
                )));
            }
            ModelOutput::Tags {
                source_tags,
                target_tags,
            }
        }
    };
    Ok(output)
}
