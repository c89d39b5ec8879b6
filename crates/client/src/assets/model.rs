//! glTF model loader.
//!
//! Loads .gltf/.glb files and extracts render meshes, the node hierarchy,
//! and keyframed animation clips. Clip channels are kept in CPU form and
//! sampled per frame from the animation driver's clip times.

use std::path::Path;

use glam::{Mat4, Quat, Vec3, Vec4};

use super::AssetError;
use crate::renderer::mesh::{MeshData, MeshVertex};

/// Which node transform component a channel drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelProperty {
    Translation,
    Rotation,
    Scale,
}

/// A single keyframed channel targeting one node.
#[derive(Clone, Debug)]
pub struct AnimationChannel {
    pub node: usize,
    pub property: ChannelProperty,
    pub times: Vec<f32>,
    /// Vec3 keys for translation/scale, quaternion xyzw for rotation.
    pub values: Vec<Vec4>,
}

/// One named clip, a set of channels plus its duration in seconds.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<AnimationChannel>,
}

/// Base (rest pose) transform of one node in the hierarchy.
#[derive(Clone, Copy, Debug)]
pub struct ModelNode {
    pub parent: Option<usize>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// A renderable mesh attached to one node.
#[derive(Clone, Debug)]
pub struct ModelMesh {
    pub node: usize,
    pub data: MeshData,
    pub color: Vec4,
}

/// CPU-side model data: meshes, node hierarchy, and animation clips.
#[derive(Clone, Debug, Default)]
pub struct CpuModel {
    pub meshes: Vec<ModelMesh>,
    pub nodes: Vec<ModelNode>,
    /// Node indices in parent-before-child order.
    pub order: Vec<usize>,
    pub clips: Vec<AnimationClip>,
    pub bounding_radius: f32,
}

impl CpuModel {
    /// Clip names and durations, for registering with the animation driver.
    pub fn clip_bindings(&self) -> Vec<(String, f32)> {
        self.clips
            .iter()
            .map(|c| (c.name.clone(), c.duration))
            .collect()
    }

    /// Compute per-node global transforms with the given clips sampled at
    /// the given times. Clips not named keep the rest pose for their nodes.
    pub fn node_global_transforms(&self, clip_times: &[(&str, f32)]) -> Vec<Mat4> {
        let mut translations: Vec<Vec3> = self.nodes.iter().map(|n| n.translation).collect();
        let mut rotations: Vec<Quat> = self.nodes.iter().map(|n| n.rotation).collect();
        let mut scales: Vec<Vec3> = self.nodes.iter().map(|n| n.scale).collect();

        for &(name, time) in clip_times {
            let Some(clip) = self.clips.iter().find(|c| c.name == name) else {
                continue;
            };
            for channel in &clip.channels {
                match channel.property {
                    ChannelProperty::Translation => {
                        translations[channel.node] = sample_vec3(channel, time);
                    }
                    ChannelProperty::Rotation => {
                        rotations[channel.node] = sample_quat(channel, time);
                    }
                    ChannelProperty::Scale => {
                        scales[channel.node] = sample_vec3(channel, time);
                    }
                }
            }
        }

        let mut globals = vec![Mat4::IDENTITY; self.nodes.len()];
        for &idx in &self.order {
            let local = Mat4::from_scale_rotation_translation(
                scales[idx],
                rotations[idx],
                translations[idx],
            );
            globals[idx] = match self.nodes[idx].parent {
                Some(parent) => globals[parent] * local,
                None => local,
            };
        }
        globals
    }
}

/// Locate the keyframe pair bracketing `time` and the blend factor between them.
fn keyframe_segment(times: &[f32], time: f32) -> (usize, usize, f32) {
    if times.is_empty() {
        return (0, 0, 0.0);
    }
    if time <= times[0] {
        return (0, 0, 0.0);
    }
    let last = times.len() - 1;
    if time >= times[last] {
        return (last, last, 0.0);
    }
    let next = times.partition_point(|&t| t <= time);
    let prev = next - 1;
    let span = times[next] - times[prev];
    let alpha = if span > 0.0 {
        (time - times[prev]) / span
    } else {
        0.0
    };
    (prev, next, alpha)
}

fn sample_vec3(channel: &AnimationChannel, time: f32) -> Vec3 {
    let (i0, i1, alpha) = keyframe_segment(&channel.times, time);
    let a = channel.values[i0].truncate();
    let b = channel.values[i1].truncate();
    a.lerp(b, alpha)
}

fn sample_quat(channel: &AnimationChannel, time: f32) -> Quat {
    let (i0, i1, alpha) = keyframe_segment(&channel.times, time);
    let a = Quat::from_vec4(channel.values[i0]);
    let b = Quat::from_vec4(channel.values[i1]);
    a.slerp(b, alpha).normalize()
}

/// Load a glTF/GLB model with its animation clips.
pub fn load_model(path: impl AsRef<Path>) -> Result<CpuModel, AssetError> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;

    // Node hierarchy with rest-pose transforms.
    let node_count = document.nodes().len();
    let mut nodes: Vec<ModelNode> = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            ModelNode {
                parent: None,
                translation: Vec3::from(translation),
                rotation: Quat::from_array(rotation),
                scale: Vec3::from(scale),
            }
        })
        .collect();
    for node in document.nodes() {
        for child in node.children() {
            nodes[child.index()].parent = Some(node.index());
        }
    }

    // Parent-before-child traversal order from the scene roots.
    let mut order = Vec::with_capacity(node_count);
    for scene in document.scenes() {
        for node in scene.nodes() {
            push_order(&node, &mut order);
        }
    }

    // Render meshes.
    let mut meshes = Vec::new();
    for node in document.nodes() {
        let Some(mesh) = node.mesh() else { continue };
        let name = mesh.name().unwrap_or("unnamed").to_string();
        for primitive in mesh.primitives() {
            let data = extract_primitive(&primitive, &buffers, &name)?;
            let base = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();
            meshes.push(ModelMesh {
                node: node.index(),
                data,
                color: Vec4::from(base),
            });
        }
    }

    // Animation clips.
    let mut clips = Vec::new();
    for animation in document.animations() {
        let name = animation
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("clip_{}", animation.index()));
        let mut duration = 0.0f32;
        let mut channels = Vec::new();

        for channel in animation.channels() {
            let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(inputs) = reader.read_inputs() else { continue };
            let times: Vec<f32> = inputs.collect();
            if let Some(&last) = times.last() {
                duration = duration.max(last);
            }

            let Some(outputs) = reader.read_outputs() else { continue };
            let (property, values) = match outputs {
                gltf::animation::util::ReadOutputs::Translations(iter) => (
                    ChannelProperty::Translation,
                    iter.map(|v| Vec4::new(v[0], v[1], v[2], 0.0)).collect(),
                ),
                gltf::animation::util::ReadOutputs::Rotations(iter) => (
                    ChannelProperty::Rotation,
                    iter.into_f32().map(Vec4::from).collect(),
                ),
                gltf::animation::util::ReadOutputs::Scales(iter) => (
                    ChannelProperty::Scale,
                    iter.map(|v| Vec4::new(v[0], v[1], v[2], 0.0)).collect(),
                ),
                gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => continue,
            };

            channels.push(AnimationChannel {
                node: channel.target().node().index(),
                property,
                times,
                values,
            });
        }

        clips.push(AnimationClip {
            name,
            duration,
            channels,
        });
    }

    let mut model = CpuModel {
        meshes,
        nodes,
        order,
        clips,
        bounding_radius: 0.0,
    };
    model.bounding_radius = rest_pose_radius(&model);

    tracing::info!(
        "Loaded model {:?}: {} meshes, {} nodes, {} clips",
        path,
        model.meshes.len(),
        model.nodes.len(),
        model.clips.len()
    );

    Ok(model)
}

fn push_order(node: &gltf::Node, order: &mut Vec<usize>) {
    order.push(node.index());
    for child in node.children() {
        push_order(&child, order);
    }
}

fn extract_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    name: &str,
) -> Result<MeshData, AssetError> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| AssetError::MissingPositions(name.to_string()))?
        .map(Vec3::from)
        .collect();

    let normals: Vec<Vec3> = reader
        .read_normals()
        .map(|iter| iter.map(Vec3::from).collect())
        .unwrap_or_else(|| vec![Vec3::Y; positions.len()]);

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    // Expand to a non-indexed triangle list, matching the rest of the renderer.
    let vertices = indices
        .iter()
        .map(|&i| MeshVertex {
            position: positions[i as usize].into(),
            normal: normals[i as usize].into(),
        })
        .collect();

    Ok(MeshData { vertices })
}

/// Largest vertex distance from the origin with all nodes at rest pose.
fn rest_pose_radius(model: &CpuModel) -> f32 {
    let globals = model.node_global_transforms(&[]);
    let mut radius = 0.0f32;
    for mesh in &model.meshes {
        let global = globals[mesh.node];
        for vertex in &mesh.data.vertices {
            let world = global.transform_point3(Vec3::from(vertex.position));
            radius = radius.max(world.length());
        }
    }
    radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_model() -> CpuModel {
        CpuModel {
            meshes: Vec::new(),
            nodes: vec![
                ModelNode {
                    parent: None,
                    translation: Vec3::new(1.0, 0.0, 0.0),
                    rotation: Quat::IDENTITY,
                    scale: Vec3::ONE,
                },
                ModelNode {
                    parent: Some(0),
                    translation: Vec3::new(0.0, 2.0, 0.0),
                    rotation: Quat::IDENTITY,
                    scale: Vec3::ONE,
                },
            ],
            order: vec![0, 1],
            clips: vec![AnimationClip {
                name: "lift".to_string(),
                duration: 1.0,
                channels: vec![AnimationChannel {
                    node: 1,
                    property: ChannelProperty::Translation,
                    times: vec![0.0, 1.0],
                    values: vec![Vec4::new(0.0, 2.0, 0.0, 0.0), Vec4::new(0.0, 4.0, 0.0, 0.0)],
                }],
            }],
            bounding_radius: 0.0,
        }
    }

    #[test]
    fn rest_pose_composes_parent_chain() {
        let globals = test_model().node_global_transforms(&[]);
        let child = globals[1].transform_point3(Vec3::ZERO);
        assert!((child - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn clip_sampling_interpolates_between_keyframes() {
        let globals = test_model().node_global_transforms(&[("lift", 0.5)]);
        let child = globals[1].transform_point3(Vec3::ZERO);
        assert!((child.y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn clip_sampling_clamps_past_last_keyframe() {
        let globals = test_model().node_global_transforms(&[("lift", 5.0)]);
        let child = globals[1].transform_point3(Vec3::ZERO);
        assert!((child.y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_clip_name_keeps_rest_pose() {
        let globals = test_model().node_global_transforms(&[("missing", 0.5)]);
        let child = globals[1].transform_point3(Vec3::ZERO);
        assert!((child.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn shipped_showcase_model_loads_with_a_clip() {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../assets/models/showcase.gltf"
        );
        let model = load_model(path).unwrap();
        assert_eq!(model.meshes.len(), 2);
        assert_eq!(model.nodes.len(), 2);
        assert_eq!(model.clips.len(), 1);
        assert_eq!(model.clips[0].name, "button-press");
        assert!((model.clips[0].duration - 1.0).abs() < 1e-6);
        // The body cube dominates the rest-pose bounds.
        assert!((model.bounding_radius - 3.0_f32.sqrt()).abs() < 1e-4);

        // The button node is driven by the clip.
        let rest = model.node_global_transforms(&[]);
        let pressed = model.node_global_transforms(&[("button-press", 0.5)]);
        let rest_y = rest[1].transform_point3(Vec3::ZERO).y;
        let pressed_y = pressed[1].transform_point3(Vec3::ZERO).y;
        assert!(pressed_y < rest_y);
    }

    #[test]
    fn keyframe_segment_brackets_time() {
        let times = [0.0, 1.0, 2.0];
        assert_eq!(keyframe_segment(&times, -1.0), (0, 0, 0.0));
        assert_eq!(keyframe_segment(&times, 3.0), (2, 2, 0.0));
        let (i0, i1, alpha) = keyframe_segment(&times, 1.5);
        assert_eq!((i0, i1), (1, 2));
        assert!((alpha - 0.5).abs() < 1e-6);
    }
}
