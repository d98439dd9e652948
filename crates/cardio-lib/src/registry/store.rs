//! Directory-backed model store
//!
//! A model identifier `id` resolves to `<root>/<id>.onnx`, falling back to
//! `<root>/<id>.json` for logistic coefficients. An optional
//! `<root>/manifest.json` pins SHA-256 checksums per identifier:
//!
//! ```json
//! { "models": { "logistic_regression": { "sha256": "9f86d0..." } } }
//! ```

use crate::error::LoadFailure;
use crate::predictor::{LogisticPredictor, OnnxPredictor, Predictor};
use crate::schema::FeatureSchema;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the optional checksum manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Source of deserialized predictors keyed by identifier
pub trait ModelStore {
    /// Load the predictor stored under `identifier` for vectors of `schema`
    fn fetch(&self, identifier: &str, schema: &FeatureSchema)
        -> Result<Box<dyn Predictor>, LoadFailure>;
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    models: HashMap<String, ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestEntry {
    sha256: String,
}

/// On-disk model format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelFormat {
    Onnx,
    Logistic,
}

impl ModelFormat {
    fn extension(self) -> &'static str {
        match self {
            ModelFormat::Onnx => "onnx",
            ModelFormat::Logistic => "json",
        }
    }
}

/// Store reading one model file per identifier from a directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    manifest: Result<Manifest, String>,
}

impl DirectoryStore {
    /// Open a store rooted at `root`, reading the manifest if present
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let manifest = read_manifest(&root.join(MANIFEST_FILE));
        if let Err(e) = &manifest {
            warn!(path = %root.display(), error = %e, "Model manifest unreadable, refusing to load models");
        }
        Self { root, manifest }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, identifier: &str) -> Option<(PathBuf, ModelFormat)> {
        [ModelFormat::Onnx, ModelFormat::Logistic]
            .into_iter()
            .map(|format| {
                let path = self
                    .root
                    .join(format!("{}.{}", identifier, format.extension()));
                (path, format)
            })
            .find(|(path, _)| path.is_file())
    }

    fn verify(&self, identifier: &str, bytes: &[u8]) -> Result<(), LoadFailure> {
        let manifest = self
            .manifest
            .as_ref()
            .map_err(|e| LoadFailure::DeserializationFailed(format!("manifest unreadable: {}", e)))?;

        match manifest.models.get(identifier) {
            Some(entry) => {
                let actual = compute_checksum(bytes);
                if !actual.eq_ignore_ascii_case(&entry.sha256) {
                    return Err(LoadFailure::DeserializationFailed(format!(
                        "checksum mismatch: expected {}, got {}",
                        entry.sha256, actual
                    )));
                }
                debug!(identifier = %identifier, "Model checksum verified");
            }
            None => debug!(identifier = %identifier, "No manifest checksum for model"),
        }
        Ok(())
    }
}

impl ModelStore for DirectoryStore {
    fn fetch(
        &self,
        identifier: &str,
        schema: &FeatureSchema,
    ) -> Result<Box<dyn Predictor>, LoadFailure> {
        if !is_valid_identifier(identifier) {
            return Err(LoadFailure::DeserializationFailed(format!(
                "invalid model identifier '{}'",
                identifier
            )));
        }

        let (path, format) = self.locate(identifier).ok_or(LoadFailure::NotFound)?;
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadFailure::NotFound,
            _ => LoadFailure::DeserializationFailed(format!("{}: {}", path.display(), e)),
        })?;
        self.verify(identifier, &bytes)?;

        match format {
            ModelFormat::Onnx => OnnxPredictor::new(&bytes, schema.len())
                .map(|p| Box::new(p) as Box<dyn Predictor>)
                .map_err(|e| LoadFailure::DeserializationFailed(format!("{:#}", e))),
            ModelFormat::Logistic => {
                let predictor = LogisticPredictor::from_json(&bytes)
                    .map_err(|e| LoadFailure::DeserializationFailed(format!("{:#}", e)))?;
                match predictor.model().schema_version.as_deref() {
                    Some(version) if version != schema.version() => {
                        Err(LoadFailure::DeserializationFailed(format!(
                            "model fitted for schema '{}', expected '{}'",
                            version,
                            schema.version()
                        )))
                    }
                    _ => Ok(Box::new(predictor) as Box<dyn Predictor>),
                }
            }
        }
    }
}

/// Identifiers must name a single file in the store and never the manifest
fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && !identifier.contains(['/', '\\'])
        && !identifier.starts_with('.')
        && !format!("{}.{}", identifier, ModelFormat::Logistic.extension())
            .eq_ignore_ascii_case(MANIFEST_FILE)
}

fn read_manifest(path: &Path) -> Result<Manifest, String> {
    match fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| e.to_string()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Manifest::default()),
        Err(e) => Err(e.to_string()),
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureVector, Label};
    use tempfile::TempDir;

    const MODEL: &str = r#"{"weights": [1.0, 1.0], "bias": -0.5}"#;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            crate::schema::HEART_DISEASE_SCHEMA_VERSION,
            vec![
                crate::schema::FeatureSpec::number("Age", "a"),
                crate::schema::FeatureSpec::category("Sex", ["Male", "Female"], "s"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum(b"test model weights");
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, compute_checksum(b"test model weights"));
    }

    #[test]
    fn test_missing_model_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::open(dir.path());
        assert_eq!(store.fetch("xgboost", &schema()).err(), Some(LoadFailure::NotFound));
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::open(dir.path().join("nope"));
        assert_eq!(store.fetch("xgboost", &schema()).err(), Some(LoadFailure::NotFound));
    }

    #[test]
    fn test_loads_logistic_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("logistic_regression.json"), MODEL).unwrap();
        let store = DirectoryStore::open(dir.path());

        let predictor = store.fetch("logistic_regression", &schema()).unwrap();
        assert_eq!(predictor.backend(), "logistic");
        assert_eq!(
            predictor.predict(&FeatureVector::new(vec![1.0, 0.0])).unwrap(),
            Label::Presence
        );
    }

    #[test]
    fn test_corrupt_onnx_fails_deserialization() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("random_forest.onnx"), b"\x00garbage").unwrap();
        let store = DirectoryStore::open(dir.path());

        let err = store.fetch("random_forest", &schema()).err().unwrap();
        assert!(matches!(err, LoadFailure::DeserializationFailed(ref m) if m.contains("ONNX")));
    }

    #[test]
    fn test_schema_version_mismatch() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("old.json"),
            r#"{"schema_version": "heart-disease/v0", "weights": [1.0, 1.0]}"#,
        )
        .unwrap();
        let store = DirectoryStore::open(dir.path());

        let err = store.fetch("old", &schema()).err().unwrap();
        assert!(matches!(err, LoadFailure::DeserializationFailed(ref m) if m.contains("heart-disease/v0")));
    }

    #[test]
    fn test_manifest_checksum_enforced() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.json"), MODEL).unwrap();
        fs::write(dir.path().join("bad.json"), MODEL).unwrap();
        let manifest = serde_json::json!({
            "models": {
                "good": { "sha256": compute_checksum(MODEL.as_bytes()) },
                "bad": { "sha256": "00".repeat(32) },
            }
        });
        fs::write(dir.path().join(MANIFEST_FILE), manifest.to_string()).unwrap();
        let store = DirectoryStore::open(dir.path());

        assert!(store.fetch("good", &schema()).is_ok());
        let err = store.fetch("bad", &schema()).err().unwrap();
        assert!(matches!(err, LoadFailure::DeserializationFailed(ref m) if m.contains("checksum mismatch")));
    }

    #[test]
    fn test_unreadable_manifest_blocks_loading() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.json"), MODEL).unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{not json").unwrap();
        let store = DirectoryStore::open(dir.path());

        assert!(matches!(
            store.fetch("good", &schema()).err(),
            Some(LoadFailure::DeserializationFailed(_))
        ));
    }

    #[test]
    fn test_path_like_identifiers_rejected() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::open(dir.path());
        for id in ["../secret", "a/b", ".hidden", ""] {
            assert!(matches!(
                store.fetch(id, &schema()).err(),
                Some(LoadFailure::DeserializationFailed(_))
            ));
        }
    }

    #[test]
    fn test_manifest_is_not_a_model() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"models": {}}"#).unwrap();
        let store = DirectoryStore::open(dir.path());

        for id in ["manifest", "MANIFEST"] {
            let err = store.fetch(id, &schema()).err().unwrap();
            assert!(matches!(err, LoadFailure::DeserializationFailed(ref m) if m.contains("invalid model identifier")));
        }
    }
}
