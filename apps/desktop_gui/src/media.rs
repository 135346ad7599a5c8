//! Model decoding for the in-app preview. STL (binary and ASCII) and
//! Wavefront OBJ become a centered, unit-sized triangle soup; other upload
//! formats have no preview.

use client_core::ModelFormat;
use glam::Vec3;
use thiserror::Error;

/// Above this the mesh is thinned so the painter stays interactive.
pub const MAX_PREVIEW_TRIANGLES: usize = 200_000;

const STL_HEADER_LEN: usize = 80;
const STL_TRIANGLE_LEN: usize = 50;

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("no in-app preview for {0:?} models")]
    NoPreview(ModelFormat),
    #[error("unrecognized model file '{0}'")]
    UnknownFormat(String),
    #[error("model contains no triangles")]
    Empty,
    #[error("binary STL is truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub normal: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
    /// Triangle count before thinning.
    pub source_triangles: usize,
}

/// Keeps every `stride`-th face while parsing, doubling the stride whenever
/// the kept set outgrows `limit`. Bounds cover every face seen, so thinning
/// never shifts the centering.
struct FaceSampler {
    limit: usize,
    stride: usize,
    seen: usize,
    faces: Vec<[Vec3; 3]>,
    min: Vec3,
    max: Vec3,
}

impl FaceSampler {
    fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            stride: 1,
            seen: 0,
            faces: Vec::new(),
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    fn push(&mut self, face: [Vec3; 3]) {
        for vertex in face {
            self.min = self.min.min(vertex);
            self.max = self.max.max(vertex);
        }
        if self.seen % self.stride == 0 {
            self.faces.push(face);
            if self.faces.len() > self.limit {
                let mut index = 0;
                self.faces.retain(|_| {
                    index += 1;
                    index % 2 == 1
                });
                self.stride *= 2;
            }
        }
        self.seen += 1;
    }

    fn finish(self) -> Result<TriangleMesh, MeshError> {
        if self.faces.is_empty() {
            return Err(MeshError::Empty);
        }
        let center = (self.min + self.max) * 0.5;
        let extent = (self.max - self.min).max_element();
        let scale = if extent > f32::EPSILON { 1.0 / extent } else { 1.0 };

        let triangles = self
            .faces
            .into_iter()
            .map(|face| {
                let vertices = face.map(|v| (v - center) * scale);
                let normal = (vertices[1] - vertices[0])
                    .cross(vertices[2] - vertices[0])
                    .normalize_or_zero();
                Triangle { vertices, normal }
            })
            .collect();

        Ok(TriangleMesh {
            triangles,
            source_triangles: self.seen,
        })
    }
}

/// Formats the viewer can draw itself.
pub fn has_preview(format: ModelFormat) -> bool {
    matches!(format, ModelFormat::Stl | ModelFormat::Obj)
}

pub fn decode_model(file_name: &str, bytes: &[u8]) -> Result<TriangleMesh, MeshError> {
    match ModelFormat::from_file_name(file_name) {
        Some(ModelFormat::Stl) => decode_stl(bytes),
        Some(ModelFormat::Obj) => decode_obj(&String::from_utf8_lossy(bytes)),
        Some(other) => Err(MeshError::NoPreview(other)),
        None => Err(MeshError::UnknownFormat(file_name.to_string())),
    }
}

pub fn decode_stl(bytes: &[u8]) -> Result<TriangleMesh, MeshError> {
    if let Some(count) = binary_stl_triangle_count(bytes) {
        let expected = STL_HEADER_LEN + 4 + count * STL_TRIANGLE_LEN;
        if bytes.len() == expected {
            return decode_binary_stl(bytes, count);
        }
        // Exporters write "solid" into binary headers too; only trust ASCII if it parses.
        if !bytes.starts_with(b"solid") {
            return Err(MeshError::Truncated {
                expected,
                found: bytes.len(),
            });
        }
    }
    decode_ascii_stl(&String::from_utf8_lossy(bytes))
}

fn binary_stl_triangle_count(bytes: &[u8]) -> Option<usize> {
    let raw = bytes.get(STL_HEADER_LEN..STL_HEADER_LEN + 4)?;
    let count = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    Some(count as usize)
}

fn read_vec3(chunk: &[u8]) -> Vec3 {
    let component = |offset: usize| {
        f32::from_le_bytes([
            chunk[offset],
            chunk[offset + 1],
            chunk[offset + 2],
            chunk[offset + 3],
        ])
    };
    Vec3::new(component(0), component(4), component(8))
}

fn decode_binary_stl(bytes: &[u8], count: usize) -> Result<TriangleMesh, MeshError> {
    let body = &bytes[STL_HEADER_LEN + 4..];
    let mut sampler = FaceSampler::new(MAX_PREVIEW_TRIANGLES);
    // 12 bytes of stored normal, then three vertices; normals are recomputed.
    for chunk in body.chunks_exact(STL_TRIANGLE_LEN).take(count) {
        let face = [
            read_vec3(&chunk[12..24]),
            read_vec3(&chunk[24..36]),
            read_vec3(&chunk[36..48]),
        ];
        if face.iter().all(|v| v.is_finite()) {
            sampler.push(face);
        }
    }
    sampler.finish()
}

fn parse_floats<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Vec3, MeshError> {
    let mut next = || -> Result<f32, MeshError> {
        let token = parts.next().ok_or_else(|| MeshError::Parse {
            line,
            reason: "expected three coordinates".to_string(),
        })?;
        token.parse::<f32>().map_err(|err| MeshError::Parse {
            line,
            reason: format!("bad coordinate '{token}': {err}"),
        })
    };
    Ok(Vec3::new(next()?, next()?, next()?))
}

fn decode_ascii_stl(text: &str) -> Result<TriangleMesh, MeshError> {
    let mut sampler = FaceSampler::new(MAX_PREVIEW_TRIANGLES);
    let mut pending: Vec<Vec3> = Vec::with_capacity(3);
    for (index, raw_line) in text.lines().enumerate() {
        let mut parts = raw_line.split_whitespace();
        match parts.next() {
            Some("vertex") => {
                pending.push(parse_floats(parts, index + 1)?);
                if pending.len() == 3 {
                    sampler.push([pending[0], pending[1], pending[2]]);
                    pending.clear();
                }
            }
            Some("endloop") => pending.clear(),
            _ => {}
        }
    }
    sampler.finish()
}

/// OBJ indices are 1-based; negative ones count back from the latest vertex.
fn resolve_obj_index(token: &str, vertex_count: usize, line: usize) -> Result<usize, MeshError> {
    let raw = token.split('/').next().unwrap_or_default();
    let index: i64 = raw.parse().map_err(|_| MeshError::Parse {
        line,
        reason: format!("bad face index '{token}'"),
    })?;
    let resolved = if index > 0 {
        index - 1
    } else {
        vertex_count as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= vertex_count as i64 {
        return Err(MeshError::Parse {
            line,
            reason: format!("face index {index} out of range"),
        });
    }
    Ok(resolved as usize)
}

pub fn decode_obj(text: &str) -> Result<TriangleMesh, MeshError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut sampler = FaceSampler::new(MAX_PREVIEW_TRIANGLES);
    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        let mut parts = raw_line.split_whitespace();
        match parts.next() {
            Some("v") => positions.push(parse_floats(parts, line)?),
            Some("f") => {
                let corners = parts
                    .map(|token| resolve_obj_index(token, positions.len(), line))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(MeshError::Parse {
                        line,
                        reason: "face needs at least three vertices".to_string(),
                    });
                }
                for pair in corners[1..].windows(2) {
                    sampler.push([positions[corners[0]], positions[pair[0]], positions[pair[1]]]);
                }
            }
            _ => {}
        }
    }
    sampler.finish()
}
