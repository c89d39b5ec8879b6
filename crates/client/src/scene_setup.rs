//! Builds the showcase scene: primitives, the text label, the wave
//! plane, and the glTF model with its animation clips.
//!
//! Asset loads are best-effort. A missing model or font logs a warning
//! and leaves the dependent features inert; everything else keeps
//! working.

use glam::Vec3;

use vitrine_core::{
    ClipPlane, GeometryKind, Material, PrimitiveShape, Stage, Transform,
};

use crate::assets::{self, GlyphFactory};
use crate::config::ClientConfig;
use crate::renderer::{primitives, Renderer};

const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const YELLOW: Vec3 = Vec3::new(1.0, 1.0, 0.0);

pub fn populate(stage: &mut Stage, renderer: &mut Renderer, config: &ClientConfig) {
    add_primitives(stage, renderer);
    add_wave_plane(stage, renderer);
    add_label(stage, renderer, config);
    add_model(stage, renderer, config);

    // The plane the cut toggle switches on and off. Installed up front;
    // whether it clips is purely the toggle's state.
    renderer.set_global_clip_plane(ClipPlane::new(Vec3::new(5.5, 0.0, 0.0), 0.8));
}

fn add_primitives(stage: &mut Stage, renderer: &mut Renderer) {
    let sphere = primitives::uv_sphere(1.0, 32, 32);
    let id = stage.scene.insert(
        GeometryKind::Primitive(PrimitiveShape::Sphere),
        Transform::at(Vec3::new(10.0, 1.0, 0.0)),
        // The sphere carries its own clip plane, independent of the
        // global cut toggle.
        Material::colored(RED).with_clip_plane(ClipPlane::new(Vec3::Y, 0.0)),
        sphere.bounding_radius(),
    );
    renderer.register_mesh(id, &sphere);

    // Four radial segments make the cone a pyramid.
    let pyramid = primitives::cone(1.0, 2.0, 4);
    let id = stage.scene.insert(
        GeometryKind::Primitive(PrimitiveShape::Cone),
        Transform::at(Vec3::new(17.0, 3.0, 0.0)),
        Material::colored(YELLOW),
        pyramid.bounding_radius(),
    );
    renderer.register_mesh(id, &pyramid);

    let cube = primitives::cube(1.0);
    let id = stage.scene.insert(
        GeometryKind::Primitive(PrimitiveShape::Cube),
        Transform::at(Vec3::new(19.0, 4.0, 0.0)),
        Material::colored(GREEN),
        cube.bounding_radius(),
    );
    renderer.register_mesh(id, &cube);
}

fn add_wave_plane(stage: &mut Stage, renderer: &mut Renderer) {
    let plane = primitives::plane(5.0, 5.0, 36, 36);
    let id = stage.scene.insert(
        GeometryKind::WavePlane,
        Transform::at(Vec3::new(0.0, 10.0, 0.0)),
        Material::colored(YELLOW),
        plane.bounding_radius(),
    );
    renderer.register_mesh(id, &plane);
}

fn add_label(stage: &mut Stage, renderer: &mut Renderer, config: &ClientConfig) {
    let font = match GlyphFactory::load(&config.font_path) {
        Ok(font) => font,
        Err(err) => {
            tracing::warn!("font load failed, label disabled: {err}");
            return;
        }
    };

    for (index, ch) in config.label.chars().enumerate() {
        let Some(mesh) = font.glyph_mesh(ch) else {
            tracing::warn!(glyph = %ch, "font has no glyph, skipping");
            continue;
        };
        let id = stage.scene.insert(
            GeometryKind::TextGlyph { ch, index },
            Transform::at(Vec3::new(index as f32 * font.advance(), 0.0, 0.0)),
            Material::colored(GREEN),
            mesh.bounding_radius(),
        );
        renderer.register_mesh(id, &mesh);
    }
}

fn add_model(stage: &mut Stage, renderer: &mut Renderer, config: &ClientConfig) {
    let model = match assets::model::load_model(&config.model_path) {
        Ok(model) => model,
        Err(err) => {
            tracing::warn!("model load failed, model features disabled: {err}");
            return;
        }
    };

    stage.scene.insert_model_root(
        Transform::at(Vec3::new(-5.0, 0.0, 0.0)),
        Material::colored(Vec3::ONE),
        model.bounding_radius,
    );
    stage.attach_model(model.clip_bindings());
    renderer.set_model(model);
}
