//! In-memory triangle meshes.
//!
//! A [`Mesh`] is the fixed geometry the transform stage consumes: separate
//! position, normal and texture coordinate streams plus faces that index into
//! them. Indices are 0-based; asset loaders are expected to normalize their
//! own conventions before building a mesh.

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("face {face} references {stream} index {index}, but only {len} exist")]
    IndexOutOfRange {
        face: usize,
        stream: &'static str,
        index: u32,
        len: usize,
    },
}

/// Represents a triangle face by indices into the mesh's attribute streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    /// Indices into the position stream.
    pub vertices: [u32; 3],
    /// Indices into the normal stream; `None` uses the smoothed position normals.
    pub normals: Option<[u32; 3]>,
    /// Indices into the texture coordinate stream; `None` maps every corner to (0, 0).
    pub texcoords: Option<[u32; 3]>,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            vertices: [a, b, c],
            normals: None,
            texcoords: None,
        }
    }

    pub const fn with_normals(mut self, normals: [u32; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    pub const fn with_texcoords(mut self, texcoords: [u32; 3]) -> Self {
        self.texcoords = Some(texcoords);
        self
    }
}

/// One fully resolved corner of a face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    faces: Vec<Face>,
    smooth_normals: Vec<Vec3>,
}

impl Mesh {
    /// Build a mesh, validating every face index against its stream.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        faces: Vec<Face>,
    ) -> Result<Self, MeshError> {
        for (i, face) in faces.iter().enumerate() {
            check_indices(i, "position", face.vertices, positions.len())?;
            if let Some(n) = face.normals {
                check_indices(i, "normal", n, normals.len())?;
            }
            if let Some(t) = face.texcoords {
                check_indices(i, "texcoord", t, texcoords.len())?;
            }
        }

        let smooth_normals = smooth_normals(&positions, &faces);
        Ok(Self {
            positions,
            normals,
            texcoords,
            faces,
            smooth_normals,
        })
    }

    /// Build a mesh from positions and faces only.
    pub fn from_positions(positions: Vec<Vec3>, faces: Vec<Face>) -> Result<Self, MeshError> {
        Self::new(positions, Vec::new(), Vec::new(), faces)
    }

    /// A unit cube centered at the origin (side length 2) with a full texture
    /// on each face. Faces are wound clockwise as seen from outside.
    pub fn cube() -> Self {
        let faces: Vec<Face> = CUBE_FACES
            .iter()
            .enumerate()
            .map(|(i, &[a, b, c])| {
                let uvs = if i % 2 == 0 { [0, 1, 2] } else { [0, 2, 3] };
                Face::new(a, b, c).with_texcoords(uvs)
            })
            .collect();

        let smooth_normals = smooth_normals(&CUBE_VERTICES, &faces);
        Self {
            positions: CUBE_VERTICES.to_vec(),
            normals: Vec::new(),
            texcoords: CUBE_TEXCOORDS.to_vec(),
            faces,
            smooth_normals,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Resolve the three corners of a face. Indices were validated at
    /// construction.
    pub fn face_vertices(&self, face: &Face) -> [Vertex; 3] {
        std::array::from_fn(|i| {
            let position_index = face.vertices[i] as usize;
            Vertex {
                position: self.positions[position_index],
                normal: match face.normals {
                    Some(n) => self.normals[n[i] as usize],
                    None => self.smooth_normals[position_index],
                },
                texcoord: match face.texcoords {
                    Some(t) => self.texcoords[t[i] as usize],
                    None => Vec2::ZERO,
                },
            }
        })
    }
}

fn check_indices(
    face: usize,
    stream: &'static str,
    indices: [u32; 3],
    len: usize,
) -> Result<(), MeshError> {
    match indices.iter().find(|&&index| index as usize >= len) {
        Some(&index) => Err(MeshError::IndexOutOfRange {
            face,
            stream,
            index,
            len,
        }),
        None => Ok(()),
    }
}

/// Per-position normals: the area-weighted sum of adjacent face normals.
fn smooth_normals(positions: &[Vec3], faces: &[Face]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for face in faces {
        let [a, b, c] = face.vertices.map(|i| positions[i as usize]);
        // Unnormalized cross product: length is twice the face area.
        let normal = (b - a).cross(c - a);
        for index in face.vertices {
            normals[index as usize] = normals[index as usize] + normal;
        }
    }
    normals.iter().map(Vec3::normalize_or_zero).collect()
}

const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

// Bottom-left, top-left, top-right, bottom-right.
const CUBE_TEXCOORDS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
];

const CUBE_FACES: [[u32; 3]; 12] = [
    // Front
    [0, 1, 2],
    [0, 2, 3],
    // Right
    [3, 2, 4],
    [3, 4, 5],
    // Back
    [5, 4, 6],
    [5, 6, 7],
    // Left
    [7, 6, 1],
    [7, 1, 0],
    // Top
    [1, 6, 4],
    [1, 4, 2],
    // Bottom
    [5, 7, 0],
    [5, 0, 3],
];
