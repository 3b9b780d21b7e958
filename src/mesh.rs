// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! CPU side mesh data as flat attribute arrays, matching what the binary
//! mesh importer produces: positions and normals are 3 floats per vertex,
//! tex coords 2 floats, indices 3 unsigned ints per triangle. Normals, tex
//! coords and tangents are optional; an absent channel is a zero-length
//! array, never a missing field.

use glam::{Vec2, Vec3};
use log::warn;

pub mod import;

#[derive(Debug, Default, Clone)]
pub struct CpuMesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub tex_coords: Vec<f32>,
    pub tangents: Vec<f32>,
    pub indices: Vec<u32>,
}

impl CpuMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    /// Checks the invariants every mesh object build relies on: a triangle
    /// list index buffer and attribute arrays sized to the vertex count.
    pub fn validate(&self) -> Result<(), String> {
        if self.vertices.is_empty() {
            return Err("mesh has no vertices".to_string());
        }
        if self.vertices.len() % 3 != 0 {
            return Err(format!(
                "vertex element count {} is not a multiple of 3",
                self.vertices.len()
            ));
        }
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            ));
        }
        let vertex_count = self.vertex_count();
        if self.has_normals() && self.normals.len() != 3 * vertex_count {
            return Err(format!(
                "normal element count {} does not match vertex count {}",
                self.normals.len(),
                vertex_count
            ));
        }
        if self.has_tex_coords() && self.tex_coords.len() != 2 * vertex_count {
            return Err(format!(
                "tex coord element count {} does not match vertex count {}",
                self.tex_coords.len(),
                vertex_count
            ));
        }
        if self.has_tangents() && self.tangents.len() != 3 * vertex_count {
            return Err(format!(
                "tangent element count {} does not match vertex count {}",
                self.tangents.len(),
                vertex_count
            ));
        }
        if let Some(&i) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(format!(
                "index {} out of range for {} vertices",
                i, vertex_count
            ));
        }
        Ok(())
    }

    /// Unit plane in the xy plane facing +z, 4 vertices and 2 triangles.
    pub fn plane() -> Self {
        Self {
            vertices: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                1.0, 1.0, 0.0,
            ],
            normals: vec![
                0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0,
            ],
            indices: vec![
                0, 1, 2, //
                1, 3, 2,
            ],
            ..Default::default()
        }
    }

    /// Unit cube with averaged corner normals, 8 vertices and 12 triangles.
    pub fn cube() -> Self {
        Self {
            vertices: vec![
                -0.50, -0.50, -0.50, //
                0.50, -0.50, -0.50, //
                -0.50, 0.50, -0.50, //
                0.50, 0.50, -0.50, //
                -0.50, -0.50, 0.50, //
                0.50, -0.50, 0.50, //
                -0.50, 0.50, 0.50, //
                0.50, 0.50, 0.50,
            ],
            normals: vec![
                -0.58, -0.58, -0.58, //
                0.82, -0.41, -0.41, //
                -0.41, 0.82, -0.41, //
                0.41, 0.41, -0.82, //
                -0.41, -0.41, 0.82, //
                0.41, -0.82, 0.41, //
                -0.82, 0.41, 0.41, //
                0.58, 0.58, 0.58,
            ],
            indices: vec![
                0, 1, 5, //
                0, 2, 3, //
                0, 3, 1, //
                0, 4, 6, //
                0, 5, 4, //
                0, 6, 2, //
                1, 3, 7, //
                1, 7, 5, //
                2, 6, 7, //
                2, 7, 3, //
                4, 5, 7, //
                4, 7, 6,
            ],
            ..Default::default()
        }
    }

    /// Computes per-vertex tangent vectors for bump/normal mapping.
    ///
    /// For each triangle the 2x2 uv-to-edge linear system is solved to get a
    /// tangent contribution, contributions are accumulated per vertex and
    /// averaged by incident face count, then Gram-Schmidt orthogonalized
    /// against the vertex normal and renormalized. Triangles with a zero uv
    /// determinant have no inverse and contribute nothing.
    pub fn compute_tangents(&mut self) {
        if !self.has_normals() || !self.has_tex_coords() {
            warn!("tangent computation skipped: mesh has no normals or no uv channel");
            return;
        }

        let vertex_count = self.vertex_count();
        let face_count = self.face_count();

        let mut accum = vec![Vec3::ZERO; vertex_count];
        let mut counts = vec![0u32; vertex_count];

        for f in 0..face_count {
            let i0 = self.indices[3 * f] as usize;
            let i1 = self.indices[3 * f + 1] as usize;
            let i2 = self.indices[3 * f + 2] as usize;

            let uv0 = Vec2::new(self.tex_coords[2 * i0], self.tex_coords[2 * i0 + 1]);
            let uv1 = Vec2::new(self.tex_coords[2 * i1], self.tex_coords[2 * i1 + 1]);
            let uv2 = Vec2::new(self.tex_coords[2 * i2], self.tex_coords[2 * i2 + 1]);
            let st1 = uv1 - uv0;
            let st2 = uv2 - uv0;

            let det = st1.x * st2.y - st2.x * st1.y;
            if det == 0.0 {
                continue; // no inverse for this triangle
            }

            let p0 = Vec3::new(
                self.vertices[3 * i0],
                self.vertices[3 * i0 + 1],
                self.vertices[3 * i0 + 2],
            );
            let p1 = Vec3::new(
                self.vertices[3 * i1],
                self.vertices[3 * i1 + 1],
                self.vertices[3 * i1 + 2],
            );
            let p2 = Vec3::new(
                self.vertices[3 * i2],
                self.vertices[3 * i2 + 1],
                self.vertices[3 * i2 + 2],
            );
            let q1 = p1 - p0;
            let q2 = p2 - p0;

            let t = (q1 * st2.y - q2 * st1.y) / det;

            accum[i0] += t;
            accum[i1] += t;
            accum[i2] += t;
            counts[i0] += 1;
            counts[i1] += 1;
            counts[i2] += 1;
        }

        self.tangents.resize(3 * vertex_count, 0.0);

        for i in 0..vertex_count {
            let n = Vec3::new(
                self.normals[3 * i],
                self.normals[3 * i + 1],
                self.normals[3 * i + 2],
            );
            let t = if counts[i] > 0 {
                accum[i] / counts[i] as f32
            } else {
                accum[i]
            };
            let t = (t - n.dot(t) * n).normalize_or_zero();

            self.tangents[3 * i] = t.x;
            self.tangents[3 * i + 1] = t.y;
            self.tangents[3 * i + 2] = t.z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_with_uvs() -> CpuMesh {
        let mut mesh = CpuMesh::plane();
        mesh.tex_coords = vec![
            0.0, 0.0, //
            1.0, 0.0, //
            0.0, 1.0, //
            1.0, 1.0,
        ];
        mesh
    }

    #[test]
    fn it_builds_cube_and_plane_with_triangle_list_indices() {
        let cube = CpuMesh::cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.indices.len() % 3, 0);
        cube.validate().unwrap();

        let plane = CpuMesh::plane();
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.indices.len(), 6);
        assert_eq!(plane.indices.len() % 3, 0);
        plane.validate().unwrap();
    }

    #[test]
    fn it_rejects_a_partial_triangle() {
        let mut mesh = CpuMesh::plane();
        mesh.indices.pop();
        let err = mesh.validate().unwrap_err();
        assert!(err.contains("multiple of 3"));
    }

    #[test]
    fn it_rejects_out_of_range_indices() {
        let mut mesh = CpuMesh::plane();
        mesh.indices[0] = 9;
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn tangents_are_unit_length_and_orthogonal_to_normals() {
        let mut mesh = plane_with_uvs();
        mesh.compute_tangents();
        assert_eq!(mesh.tangents.len(), 3 * mesh.vertex_count());

        for i in 0..mesh.vertex_count() {
            let t = Vec3::new(
                mesh.tangents[3 * i],
                mesh.tangents[3 * i + 1],
                mesh.tangents[3 * i + 2],
            );
            let n = Vec3::new(
                mesh.normals[3 * i],
                mesh.normals[3 * i + 1],
                mesh.normals[3 * i + 2],
            );
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(t).abs() < 1e-5);
        }
    }

    #[test]
    fn tangents_follow_increasing_u() {
        let mut mesh = plane_with_uvs();
        mesh.compute_tangents();
        // the u axis of the uv mapping runs along +x for this plane
        for i in 0..mesh.vertex_count() {
            assert!((mesh.tangents[3 * i] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn degenerate_uv_triangles_contribute_nothing() {
        let mut mesh = CpuMesh::plane();
        // every vertex maps to the same uv point: all determinants are zero
        mesh.tex_coords = vec![0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5];
        mesh.compute_tangents();
        for v in &mesh.tangents {
            assert!(v.is_finite());
            assert_eq!(*v, 0.0);
        }
    }

    #[test]
    fn degenerate_faces_do_not_pollute_valid_ones() {
        // two triangles sharing vertices 1 and 2; moving vertex 3's uv onto
        // the line between them collapses the second triangle's uv area
        let mut mesh = plane_with_uvs();
        mesh.tex_coords[6] = 0.5;
        mesh.tex_coords[7] = 0.5;
        mesh.compute_tangents();
        // vertex 0 only touches the first (valid) triangle
        let t = Vec3::new(mesh.tangents[0], mesh.tangents[1], mesh.tangents[2]);
        assert!((t.length() - 1.0).abs() < 1e-5);
        // vertex 3 only touches the degenerate one
        let t3 = Vec3::new(mesh.tangents[9], mesh.tangents[10], mesh.tangents[11]);
        assert_eq!(t3, Vec3::ZERO);
    }

    #[test]
    fn tangents_skipped_without_uv_channel() {
        let mut mesh = CpuMesh::cube();
        mesh.compute_tangents();
        assert!(!mesh.has_tangents());
    }
}
