//! Mesh building utilities for procedural 3D geometry.
//!
//! All meshes are arrays of triangles with position + normal data.

use glam::Vec3;

/// Vertex with position and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Built mesh data ready for GPU upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Radius of the bounding sphere around the local origin, used for
    /// ray picking.
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| Vec3::from(v.position).length())
            .fold(0.0, f32::max)
    }
}

/// Fluent mesh builder for procedural geometry.
#[derive(Default)]
pub struct MeshBuilder {
    vertices: Vec<MeshVertex>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triangle with automatic normal calculation.
    pub fn add_triangle(&mut self, p1: Vec3, p2: Vec3, p3: Vec3) -> &mut Self {
        let u = p2 - p1;
        let v = p3 - p1;
        let normal = u.cross(v).normalize_or_zero();
        self.add_triangle_with_normals(p1, normal, p2, normal, p3, normal)
    }

    /// Add a triangle with explicit normals.
    pub fn add_triangle_with_normals(
        &mut self,
        p1: Vec3,
        n1: Vec3,
        p2: Vec3,
        n2: Vec3,
        p3: Vec3,
        n3: Vec3,
    ) -> &mut Self {
        self.vertices.push(MeshVertex {
            position: p1.into(),
            normal: n1.into(),
        });
        self.vertices.push(MeshVertex {
            position: p2.into(),
            normal: n2.into(),
        });
        self.vertices.push(MeshVertex {
            position: p3.into(),
            normal: n3.into(),
        });
        self
    }

    /// Add a quad (two triangles), corners in counter-clockwise order.
    pub fn add_quad(&mut self, p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3) -> &mut Self {
        self.add_triangle(p1, p2, p3);
        self.add_triangle(p1, p3, p4)
    }

    /// Add an axis-aligned box from its center and half extents.
    pub fn add_box(&mut self, center: Vec3, half: Vec3) -> &mut Self {
        let (x, y, z) = (half.x, half.y, half.z);
        let corner = |sx: f32, sy: f32, sz: f32| center + Vec3::new(sx * x, sy * y, sz * z);

        // +Z face
        self.add_quad(
            corner(-1.0, -1.0, 1.0),
            corner(1.0, -1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
        );
        // -Z face
        self.add_quad(
            corner(1.0, -1.0, -1.0),
            corner(-1.0, -1.0, -1.0),
            corner(-1.0, 1.0, -1.0),
            corner(1.0, 1.0, -1.0),
        );
        // +X face
        self.add_quad(
            corner(1.0, -1.0, 1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(1.0, 1.0, 1.0),
        );
        // -X face
        self.add_quad(
            corner(-1.0, -1.0, -1.0),
            corner(-1.0, -1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
            corner(-1.0, 1.0, -1.0),
        );
        // +Y face
        self.add_quad(
            corner(-1.0, 1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(1.0, 1.0, -1.0),
            corner(-1.0, 1.0, -1.0),
        );
        // -Y face
        self.add_quad(
            corner(-1.0, -1.0, -1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, -1.0, 1.0),
            corner(-1.0, -1.0, 1.0),
        )
    }

    pub fn build(&mut self) -> MeshData {
        MeshData {
            vertices: std::mem::take(&mut self.vertices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_normal_is_unit_length() {
        let mut builder = MeshBuilder::new();
        builder.add_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
        let mesh = builder.build();
        assert_eq!(mesh.vertex_count(), 3);
        for vertex in &mesh.vertices {
            assert!((Vec3::from(vertex.normal).length() - 1.0).abs() < 1e-5);
        }
        // CCW in the XY plane faces +Z.
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn box_has_twelve_triangles() {
        let mut builder = MeshBuilder::new();
        builder.add_box(Vec3::ZERO, Vec3::splat(0.5));
        let mesh = builder.build();
        assert_eq!(mesh.vertex_count(), 36);
    }

    #[test]
    fn bounding_radius_covers_all_vertices() {
        let mut builder = MeshBuilder::new();
        builder.add_box(Vec3::ZERO, Vec3::splat(1.0));
        let mesh = builder.build();
        assert!((mesh.bounding_radius() - 3.0_f32.sqrt()).abs() < 1e-5);
    }
}
