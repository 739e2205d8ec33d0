//! Face-embedding readers.
//!
//! The embedding math itself is an external service; the guard only
//! consumes ordered embedding vectors (first = most prominent face).

use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;
use vigil_core::{FaceReader, Frame, GuardError, GuardResult};

#[derive(Debug, Deserialize)]
struct FaceEntry {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct FacesResponse {
    faces: Vec<FaceEntry>,
}

/// Remote face-embedding service speaking `POST {base}/faces/embed` with a
/// multipart image and replying `{"faces":[{"embedding":[..]}, ...]}`.
/// Uses `VIGIL_FACE_API_URL` and optional `VIGIL_FACE_API_KEY`.
pub struct HttpFaceReader {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpFaceReader {
    /// Build from environment; errors when `VIGIL_FACE_API_URL` is unset.
    pub fn from_env() -> GuardResult<Self> {
        let base_url = std::env::var("VIGIL_FACE_API_URL").map_err(|_| {
            GuardError::Config("face reader requires VIGIL_FACE_API_URL".to_string())
        })?;
        let api_key = std::env::var("VIGIL_FACE_API_KEY").ok();
        Self::new(base_url, api_key)
    }

    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> GuardResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| GuardError::Vision(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key,
            client,
        })
    }
}

impl FaceReader for HttpFaceReader {
    fn read_faces(&self, frame: &Frame) -> GuardResult<Vec<Vec<f32>>> {
        let url = format!("{}/faces/embed", self.base_url.trim_end_matches('/'));
        let part = reqwest::blocking::multipart::Part::bytes(frame.bytes.clone())
            .file_name("frame.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| GuardError::Vision(e.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);

        let mut request = self.client.post(&url).multipart(form);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }
        let res = request
            .send()
            .map_err(|e| GuardError::Vision(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(GuardError::Vision(format!(
                "face API error {}: {}",
                status, body
            )));
        }
        let parsed: FacesResponse = res.json().map_err(|e| GuardError::Vision(e.to_string()))?;
        debug!(faces = parsed.faces.len(), "face reader response");
        Ok(parsed.faces.into_iter().map(|f| f.embedding).collect())
    }
}

/// Scripted face reader for tests and offline runs: pops one prepared
/// result per frame, then reports no faces.
#[derive(Debug, Default)]
pub struct PlaceholderFaceReader {
    script: Mutex<VecDeque<Vec<Vec<f32>>>>,
}

impl PlaceholderFaceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Vec<Vec<Vec<f32>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

impl FaceReader for PlaceholderFaceReader {
    fn read_faces(&self, _frame: &Frame) -> GuardResult<Vec<Vec<f32>>> {
        Ok(self
            .script
            .lock()
            .map_err(|e| GuardError::Vision(format!("script lock poisoned: {}", e)))?
            .pop_front()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_pops_script_then_sees_nothing() {
        let reader =
            PlaceholderFaceReader::with_script(vec![vec![vec![0.1, 0.2]], Vec::new()]);
        let frame = Frame::new(vec![0xFF]);
        assert_eq!(reader.read_faces(&frame).unwrap(), vec![vec![0.1, 0.2]]);
        assert!(reader.read_faces(&frame).unwrap().is_empty());
        assert!(reader.read_faces(&frame).unwrap().is_empty());
    }

    #[test]
    fn faces_response_parses() {
        let parsed: FacesResponse =
            serde_json::from_str(r#"{"faces":[{"embedding":[0.5,-0.25]}]}"#).unwrap();
        assert_eq!(parsed.faces.len(), 1);
        assert_eq!(parsed.faces[0].embedding, vec![0.5, -0.25]);
    }
}
