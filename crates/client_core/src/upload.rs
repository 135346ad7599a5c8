//! Local checks for 3D model uploads. Everything here runs before a request
//! is built, so a rejected file never reaches the network.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// 10 GiB, matching the backend's streaming limit.
pub const MAX_MODEL_UPLOAD_BYTES: u64 = 10 * 1024 * 1024 * 1024;

pub const ALLOWED_MODEL_EXTENSIONS: &[&str] = &["glb", "gltf", "obj", "fbx", "stl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    Glb,
    Gltf,
    Obj,
    Fbx,
    Stl,
}

impl ModelFormat {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "glb" => Some(ModelFormat::Glb),
            "gltf" => Some(ModelFormat::Gltf),
            "obj" => Some(ModelFormat::Obj),
            "fbx" => Some(ModelFormat::Fbx),
            "stl" => Some(ModelFormat::Stl),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelFormat::Glb => "glTF binary",
            ModelFormat::Gltf => "glTF",
            ModelFormat::Obj => "Wavefront OBJ",
            ModelFormat::Fbx => "FBX",
            ModelFormat::Stl => "STL",
        }
    }

    fn fallback_mime(self) -> &'static str {
        match self {
            ModelFormat::Glb => "model/gltf-binary",
            ModelFormat::Gltf => "model/gltf+json",
            ModelFormat::Obj => "model/obj",
            ModelFormat::Stl => "model/stl",
            ModelFormat::Fbx => "application/octet-stream",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("no file selected")]
    Empty,
    #[error("only one model file can be uploaded at a time ({count} given)")]
    MultipleFiles { count: usize },
    #[error("file type '{extension}' not supported; allowed types: .glb, .gltf, .obj, .fbx, .stl")]
    UnsupportedType { extension: String },
    #[error("file is too large ({size} bytes); maximum size is 10GB")]
    TooLarge { size: u64, limit: u64 },
    #[error("cannot read '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

/// A model file that passed every local check and is ready to stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub format: ModelFormat,
    pub mime_type: String,
}

/// Pure name/size check shared by the picker and drag-and-drop paths.
pub fn check_model_candidate(file_name: &str, size_bytes: u64) -> Result<ModelFormat, UploadRejection> {
    let format = ModelFormat::from_file_name(file_name).ok_or_else(|| {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_else(|| "(none)".to_string());
        UploadRejection::UnsupportedType { extension }
    })?;

    if size_bytes > MAX_MODEL_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge {
            size: size_bytes,
            limit: MAX_MODEL_UPLOAD_BYTES,
        });
    }

    Ok(format)
}

pub fn inspect_model_file(path: &Path) -> Result<ModelFile, UploadRejection> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| UploadRejection::Unreadable {
            path: path.display().to_string(),
            reason: "path has no file name".to_string(),
        })?;

    // Type first: a disallowed file is rejected even if it cannot be stat'ed.
    check_model_candidate(&file_name, 0)?;

    let metadata = std::fs::metadata(path).map_err(|err| UploadRejection::Unreadable {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    if !metadata.is_file() {
        return Err(UploadRejection::Unreadable {
            path: path.display().to_string(),
            reason: "not a regular file".to_string(),
        });
    }

    let format = check_model_candidate(&file_name, metadata.len())?;
    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .map(str::to_string)
        .unwrap_or_else(|| format.fallback_mime().to_string());

    Ok(ModelFile {
        path: path.to_path_buf(),
        file_name,
        size_bytes: metadata.len(),
        format,
        mime_type,
    })
}

/// Accepts exactly one path, as produced by a file dialog or a window drop.
pub fn select_single_model(paths: &[PathBuf]) -> Result<ModelFile, UploadRejection> {
    match paths {
        [] => Err(UploadRejection::Empty),
        [path] => inspect_model_file(path),
        many => Err(UploadRejection::MultipleFiles { count: many.len() }),
    }
}
