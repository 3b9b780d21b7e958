// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Importer for the binary OpenCTM mesh container, the fixed interchange
//! format the demo meshes ship in. Only the RAW (uncompressed) transcoding
//! is understood; the compressed MG1/MG2 transcodings are rejected. The
//! importer hands back flat arrays and treats missing normal/uv channels as
//! zero-length, logging a warning — downstream rendering degrades instead
//! of failing.
//!
//! RAW layout, all little endian:
//!   "OCTM" version method vertex_count triangle_count uv_map_count
//!   attr_map_count flags comment
//!   "INDX" u32*3*triangles
//!   "VERT" f32*3*vertices
//!   "NORM" f32*3*vertices            (iff flags bit 0)
//!   per uv map: "TEXC" name filename f32*2*vertices
//! Strings are an i32 length followed by that many bytes.

use super::CpuMesh;
use crate::util::get_abs_path;
use log::{info, warn};
use std::fs;

const CTM_MAGIC: u32 = fourcc(b"OCTM");
const CTM_METHOD_RAW: u32 = fourcc(b"RAW\0");
const CTM_METHOD_MG1: u32 = fourcc(b"MG1\0");
const CTM_METHOD_MG2: u32 = fourcc(b"MG2\0");
const SECTION_INDICES: u32 = fourcc(b"INDX");
const SECTION_VERTICES: u32 = fourcc(b"VERT");
const SECTION_NORMALS: u32 = fourcc(b"NORM");
const SECTION_UV_MAP: u32 = fourcc(b"TEXC");

const FLAG_HAS_NORMALS: u32 = 0x0000_0001;

const fn fourcc(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

/// Reads a mesh container file, resolving relative paths against the
/// project root.
pub fn read_mesh_file(path: &str) -> Result<CpuMesh, String> {
    let data = fs::read(get_abs_path(path)).map_err(|e| format!("{}: {}", path, e))?;
    let mesh = read_mesh(&data).map_err(|e| format!("{}: {}", path, e))?;
    info!(
        "loaded mesh {} ({} vertices, {} triangles)",
        path,
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parses a mesh container from memory.
pub fn read_mesh(data: &[u8]) -> Result<CpuMesh, String> {
    let mut r = Reader { data, at: 0 };

    if r.read_u32()? != CTM_MAGIC {
        return Err("not a CTM mesh container".to_string());
    }
    let _version = r.read_u32()?;
    let method = r.read_u32()?;
    match method {
        CTM_METHOD_RAW => {}
        CTM_METHOD_MG1 | CTM_METHOD_MG2 => {
            return Err("compressed CTM transcoding is not supported".to_string());
        }
        _ => return Err("unknown CTM transcoding".to_string()),
    }

    let vertex_count = r.read_u32()? as usize;
    let triangle_count = r.read_u32()? as usize;
    let uv_map_count = r.read_u32()? as usize;
    let _attr_map_count = r.read_u32()?;
    let flags = r.read_u32()?;
    let _comment = r.read_string()?;

    r.expect_section(SECTION_INDICES)?;
    let mut indices = Vec::with_capacity(3 * triangle_count);
    for _ in 0..3 * triangle_count {
        indices.push(r.read_u32()?);
    }

    r.expect_section(SECTION_VERTICES)?;
    let mut vertices = Vec::with_capacity(3 * vertex_count);
    for _ in 0..3 * vertex_count {
        vertices.push(r.read_f32()?);
    }

    let mut normals = Vec::new();
    if flags & FLAG_HAS_NORMALS != 0 {
        r.expect_section(SECTION_NORMALS)?;
        normals.reserve(3 * vertex_count);
        for _ in 0..3 * vertex_count {
            normals.push(r.read_f32()?);
        }
    } else {
        warn!("*** normals not found");
    }

    let mut tex_coords = Vec::new();
    if uv_map_count == 0 {
        warn!("*** uv map not found");
    }
    for map in 0..uv_map_count {
        r.expect_section(SECTION_UV_MAP)?;
        let _name = r.read_string()?;
        let _filename = r.read_string()?;
        // only the first uv map is kept, the rest are consumed and dropped
        if map == 0 {
            tex_coords.reserve(2 * vertex_count);
            for _ in 0..2 * vertex_count {
                tex_coords.push(r.read_f32()?);
            }
        } else {
            for _ in 0..2 * vertex_count {
                r.read_f32()?;
            }
        }
    }

    Ok(CpuMesh {
        vertices,
        normals,
        tex_coords,
        tangents: Vec::new(),
        indices,
    })
}

struct Reader<'a> {
    data: &'a [u8],
    at: usize,
}

impl<'a> Reader<'a> {
    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], String> {
        if self.at + n > self.data.len() {
            return Err("truncated mesh container".to_string());
        }
        let slice = &self.data[self.at..self.at + n];
        self.at += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, String> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f32(&mut self) -> Result<f32, String> {
        let b = self.read_bytes(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_string(&mut self) -> Result<String, String> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn expect_section(&mut self, tag: u32) -> Result<(), String> {
        let found = self.read_u32()?;
        if found != tag {
            return Err(format!(
                "unexpected section {:08x}, wanted {:08x}",
                found, tag
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Writer {
        data: Vec<u8>,
    }

    impl Writer {
        fn new(method: &[u8; 4]) -> Self {
            let mut w = Writer { data: vec![] };
            w.data.extend_from_slice(b"OCTM");
            w.u32(5);
            w.data.extend_from_slice(method);
            w
        }

        fn u32(&mut self, v: u32) {
            self.data.extend_from_slice(&v.to_le_bytes());
        }

        fn f32(&mut self, v: f32) {
            self.data.extend_from_slice(&v.to_le_bytes());
        }

        fn string(&mut self, s: &str) {
            self.u32(s.len() as u32);
            self.data.extend_from_slice(s.as_bytes());
        }
    }

    fn single_triangle(with_normals: bool, uv_maps: usize) -> Vec<u8> {
        let mut w = Writer::new(b"RAW\0");
        w.u32(3); // vertices
        w.u32(1); // triangles
        w.u32(uv_maps as u32);
        w.u32(0); // attr maps
        w.u32(if with_normals { 1 } else { 0 });
        w.string("made by tests");

        w.data.extend_from_slice(b"INDX");
        for i in [0u32, 1, 2] {
            w.u32(i);
        }
        w.data.extend_from_slice(b"VERT");
        for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            w.f32(v);
        }
        if with_normals {
            w.data.extend_from_slice(b"NORM");
            for _ in 0..3 {
                w.f32(0.0);
                w.f32(0.0);
                w.f32(1.0);
            }
        }
        for m in 0..uv_maps {
            w.data.extend_from_slice(b"TEXC");
            w.string("diffuse");
            w.string("");
            let scale = (m + 1) as f32;
            for v in [0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0] {
                w.f32(v * scale);
            }
        }
        w.data
    }

    #[test]
    fn it_reads_a_raw_container_back_intact() {
        let mesh = read_mesh(&single_triangle(true, 1)).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.normals.len(), 9);
        assert_eq!(mesh.tex_coords, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        mesh.validate().unwrap();
    }

    #[test]
    fn it_keeps_only_the_first_uv_map() {
        let mesh = read_mesh(&single_triangle(true, 2)).unwrap();
        assert_eq!(mesh.tex_coords, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_channels_degrade_to_empty_arrays() {
        let mesh = read_mesh(&single_triangle(false, 0)).unwrap();
        assert!(!mesh.has_normals());
        assert!(!mesh.has_tex_coords());
        mesh.validate().unwrap();
    }

    #[test]
    fn it_rejects_compressed_transcodings() {
        let mut w = Writer::new(b"MG1\0");
        w.u32(0);
        let err = read_mesh(&w.data).unwrap_err();
        assert!(err.contains("not supported"));
    }

    #[test]
    fn it_rejects_other_containers() {
        assert!(read_mesh(b"PNG\x0dwhatever").is_err());
    }

    #[test]
    fn it_rejects_truncated_files() {
        let mut data = single_triangle(true, 1);
        data.truncate(data.len() - 5);
        let err = read_mesh(&data).unwrap_err();
        assert!(err.contains("truncated"));
    }
}
