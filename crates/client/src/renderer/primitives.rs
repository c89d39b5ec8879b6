//! Procedural primitive meshes for the scene dressing.

use std::f32::consts::TAU;

use glam::Vec3;

use super::mesh::{MeshBuilder, MeshData};

/// UV sphere with smooth normals.
pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> MeshData {
    let point = |stack: u32, sector: u32| {
        let v = stack as f32 / stacks as f32;
        let u = sector as f32 / sectors as f32;
        let phi = v * std::f32::consts::PI;
        let theta = u * TAU;
        Vec3::new(
            phi.sin() * theta.cos(),
            phi.cos(),
            phi.sin() * theta.sin(),
        )
    };

    let mut builder = MeshBuilder::new();
    for stack in 0..stacks {
        for sector in 0..sectors {
            // Unit-sphere points double as smooth normals.
            let a = point(stack, sector);
            let b = point(stack + 1, sector);
            let c = point(stack + 1, sector + 1);
            let d = point(stack, sector + 1);
            builder.add_triangle_with_normals(a * radius, a, b * radius, b, c * radius, c);
            builder.add_triangle_with_normals(a * radius, a, c * radius, c, d * radius, d);
        }
    }
    builder.build()
}

/// Cone (a pyramid when `segments` is small), base on the -Y side,
/// centered on the local origin.
pub fn cone(radius: f32, height: f32, segments: u32) -> MeshData {
    let apex = Vec3::new(0.0, height / 2.0, 0.0);
    let base_y = -height / 2.0;
    let rim = |i: u32| {
        let theta = i as f32 / segments as f32 * TAU;
        Vec3::new(radius * theta.cos(), base_y, radius * theta.sin())
    };

    let mut builder = MeshBuilder::new();
    for i in 0..segments {
        let a = rim(i);
        let b = rim(i + 1);
        builder.add_triangle(a, apex, b);
        builder.add_triangle(Vec3::new(0.0, base_y, 0.0), b, a);
    }
    builder.build()
}

/// Axis-aligned cube centered on the local origin.
pub fn cube(size: f32) -> MeshData {
    let mut builder = MeshBuilder::new();
    builder.add_box(Vec3::ZERO, Vec3::splat(size / 2.0));
    builder.build()
}

/// Subdivided plane in the XY plane, centered on the local origin and
/// facing +Z. Rendered without backface culling, so it reads as
/// double-sided.
pub fn plane(width: f32, height: f32, segments_x: u32, segments_y: u32) -> MeshData {
    let mut builder = MeshBuilder::new();
    let step_x = width / segments_x as f32;
    let step_y = height / segments_y as f32;
    let origin = Vec3::new(-width / 2.0, -height / 2.0, 0.0);
    for iy in 0..segments_y {
        for ix in 0..segments_x {
            let p = origin + Vec3::new(ix as f32 * step_x, iy as f32 * step_y, 0.0);
            builder.add_quad(
                p,
                p + Vec3::new(step_x, 0.0, 0.0),
                p + Vec3::new(step_x, step_y, 0.0),
                p + Vec3::new(0.0, step_y, 0.0),
            );
        }
    }
    builder.build()
}
