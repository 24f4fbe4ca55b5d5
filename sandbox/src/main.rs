// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Ember sandbox
// Renders a small lit scene through the headless backend and logs frame statistics.

use anyhow::{Context, Result};
use ember_agents::config::load_settings;
use ember_agents::render_agent::{RenderAgent, RenderSubmitter, ResourceSender};
use ember_core::math::{LinearRgba, Mat4, Quat, Sphere, UVec2, Vec3};
use ember_core::renderer::api::*;
use ember_core::renderer::{
    DirectionalRenderLight, DirectionalShadow, PointRenderLight, ShadowVolume,
};
use ember_core::task::TaskContext;
use ember_infra::graphics::headless::HeadlessBackend;
use ember_infra::graphics::RenderCommandProcessor;
use ember_infra::task::WorkerTaskContext;
use ember_infra::telemetry::init_logging;
use std::sync::Arc;

const RESOLUTION: UVec2 = UVec2::new(1280, 720);
const FRAME_COUNT: usize = 8;
const DEFAULT_SETTINGS_PATH: &str = "sandbox/render.ron";

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct StaticVertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct SpriteVertex {
    position: [f32; 3],
    uv: [f32; 2],
    colour: [f32; 4],
}

const LIT_VS: &str = include_str!("shaders/lit.vert");
const LIT_FS: &str = include_str!("shaders/lit.frag");
const SHADOW_VS: &str = include_str!("shaders/shadow.vert");
const SHADOW_FS: &str = include_str!("shaders/shadow.frag");
const SPRITE_VS: &str = include_str!("shaders/sprite.vert");
const SPRITE_FS: &str = include_str!("shaders/sprite.frag");

/// Resources the demo scene is built from.
struct SceneAssets {
    shaders: Vec<Arc<RenderShader>>,
    solid: Arc<RenderMaterialGroup>,
    glass: Arc<RenderMaterialGroup>,
    hud: Arc<RenderMaterialGroup>,
    cube: Arc<RenderMesh>,
    shadow_depth: Arc<RenderTexture>,
    shadow_target: Arc<RenderTargetGroup>,
}

impl SceneAssets {
    fn load(sender: &ResourceSender) -> Self {
        let lit = Arc::new(RenderShader::new("lit"));
        let shadow = Arc::new(RenderShader::new("shadow"));
        let sprite = Arc::new(RenderShader::new("sprite"));
        sender.load_shader(lit.clone(), LIT_VS, LIT_FS);
        sender.load_shader(shadow.clone(), SHADOW_VS, SHADOW_FS);
        sender.load_shader(sprite.clone(), SPRITE_VS, SPRITE_FS);

        let lit_material = |diffuse: LinearRgba| {
            Arc::new(RenderMaterial::new(lit.clone()).with_colours(
                LinearRgba::BLACK,
                diffuse,
                diffuse,
                LinearRgba::WHITE,
            ))
        };
        let stone = lit_material(LinearRgba::rgb(0.6, 0.6, 0.55));
        let solid = RenderMaterialGroup::new()
            .with_material(VertexFormat::StaticMesh, ForwardRenderPass::Base, stone.clone())
            .with_material(
                VertexFormat::StaticMesh,
                ForwardRenderPass::DirectionalLight,
                stone.clone(),
            )
            .with_material(
                VertexFormat::StaticMesh,
                ForwardRenderPass::DirectionalLightShadows,
                stone.clone(),
            )
            .with_material(VertexFormat::StaticMesh, ForwardRenderPass::PointLight, stone)
            .with_material(
                VertexFormat::StaticMesh,
                ForwardRenderPass::ShadowMap,
                Arc::new(
                    RenderMaterial::new(shadow.clone())
                        .with_render_state(MaterialRenderState::shadow_map()),
                ),
            );
        let glass = RenderMaterialGroup::new().with_material(
            VertexFormat::StaticMesh,
            ForwardRenderPass::Transparent,
            Arc::new(
                RenderMaterial::new(lit.clone())
                    .with_render_state(MaterialRenderState::transparent())
                    .with_colours(
                        LinearRgba::BLACK,
                        LinearRgba::rgb(0.2, 0.4, 0.8).with_alpha(0.4),
                        LinearRgba::rgb(0.2, 0.4, 0.8).with_alpha(0.4),
                        LinearRgba::WHITE,
                    )
                    .with_uniform("u_refraction", UniformValue::Float(1.33)),
            ),
        );
        let hud = RenderMaterialGroup::new().with_material(
            VertexFormat::Sprite,
            ForwardRenderPass::Transparent,
            Arc::new(
                RenderMaterial::new(sprite.clone())
                    .with_render_state(MaterialRenderState::transparent()),
            ),
        );
        let (solid, glass, hud) = (Arc::new(solid), Arc::new(glass), Arc::new(hud));
        for group in [&solid, &glass, &hud] {
            sender.load_material_group(group.clone());
        }

        let (vertices, indices) = cube_geometry();
        let cube = Arc::new(RenderMesh::new(
            MeshLayout {
                polygon_type: PolygonType::Triangle,
                vertex_format: VertexFormat::StaticMesh,
                index_format: IndexFormat::U16,
                vertex_count: vertices.len() as u32,
                index_count: indices.len() as u32,
            },
            Sphere::new(Vec3::ZERO, 3f32.sqrt() * 0.5),
        ));
        sender.load_mesh(
            cube.clone(),
            bytemuck::cast_slice::<_, u8>(&vertices).into(),
            bytemuck::cast_slice::<_, u8>(&indices).into(),
        );

        let shadow_depth = Arc::new(RenderTexture::new(TextureDescriptor::depth(UVec2::splat(
            2048,
        ))));
        let shadow_target = Arc::new(RenderTargetGroup::depth_only(shadow_depth.clone()));
        sender.load_texture(shadow_depth.clone(), None);
        sender.load_target_group(shadow_target.clone());

        Self {
            shaders: vec![lit, shadow, sprite],
            solid,
            glass,
            hud,
            cube,
            shadow_depth,
            shadow_target,
        }
    }

    fn unload(&self, sender: &ResourceSender) {
        sender.unload_target_group(self.shadow_target.clone());
        sender.unload_texture(self.shadow_depth.clone());
        sender.unload_mesh(self.cube.clone());
        for group in [&self.solid, &self.glass, &self.hud] {
            sender.unload_material_group(group.clone());
        }
        for shader in &self.shaders {
            sender.unload_shader(shader.clone());
        }
    }

    fn build_frame(&self, agent: &RenderAgent, time: f32) -> RenderFrame {
        let eye = Vec3::new(12.0 * time.cos(), 6.0, 12.0 * time.sin());
        let camera = RenderCamera::perspective(
            Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).inverse(),
            55f32.to_radians(),
            RESOLUTION.x as f32 / RESOLUTION.y as f32,
            0.1,
            100.0,
        );
        let mut frame = agent.create_frame(RESOLUTION, camera);

        for x in -3..=3 {
            for z in -3..=3 {
                let group = if (x + z) % 4 == 0 { &self.glass } else { &self.solid };
                let position = Vec3::new(x as f32 * 2.5, 0.5, z as f32 * 2.5);
                frame.render_objects.push(RenderObject::new(
                    group.clone(),
                    RenderObjectMesh::Static(self.cube.clone()),
                    Mat4::from_rotation_translation(Quat::from_rotation_y(time + x as f32), position),
                    RenderLayer::Standard,
                ));
            }
        }
        frame.render_objects.push(RenderObject::new(
            self.solid.clone(),
            RenderObjectMesh::Static(self.cube.clone()),
            Mat4::from_scale_rotation_translation(
                Vec3::new(20.0, 0.2, 20.0),
                Quat::IDENTITY,
                Vec3::new(0.0, -0.1, 0.0),
            ),
            RenderLayer::Standard,
        ));
        frame.render_objects.push(self.hud_panel(time));

        let sun_eye = Vec3::new(8.0, 15.0, 4.0);
        frame.directional_lights.push(
            DirectionalRenderLight::new(LinearRgba::rgb(1.0, 0.95, 0.85), -sun_eye).with_shadow(
                DirectionalShadow {
                    target: self.shadow_target.clone(),
                    light_world_matrix: Mat4::look_at_rh(sun_eye, Vec3::ZERO, Vec3::Y).inverse(),
                    volume: ShadowVolume {
                        width: 24.0,
                        height: 24.0,
                        near: 1.0,
                        far: 40.0,
                    },
                    tolerance: 0.002,
                },
            ),
        );
        frame.point_lights.push(PointRenderLight::new(
            LinearRgba::rgb(1.0, 0.4, 0.1),
            Vec3::new(-4.0, 2.0, -4.0),
            5.0,
        ));
        frame.point_lights.push(PointRenderLight::new(
            LinearRgba::rgb(0.2, 0.6, 1.0),
            Vec3::new(5.0, 2.0, 3.0),
            4.0,
        ));
        frame
    }

    // The HUD is rebuilt every frame as a dynamic quad batch.
    fn hud_panel(&self, time: f32) -> RenderObject {
        let fill = 0.5 + 0.5 * time.sin();
        let quad = |x0: f32, y0: f32, x1: f32, y1: f32, colour: [f32; 4]| {
            [
                SpriteVertex { position: [x0, y0, 0.0], uv: [0.0, 0.0], colour },
                SpriteVertex { position: [x1, y0, 0.0], uv: [1.0, 0.0], colour },
                SpriteVertex { position: [x1, y1, 0.0], uv: [1.0, 1.0], colour },
                SpriteVertex { position: [x0, y0, 0.0], uv: [0.0, 0.0], colour },
                SpriteVertex { position: [x1, y1, 0.0], uv: [1.0, 1.0], colour },
                SpriteVertex { position: [x0, y1, 0.0], uv: [0.0, 1.0], colour },
            ]
        };
        let mut vertices = Vec::with_capacity(12);
        vertices.extend(quad(16.0, 16.0, 336.0, 48.0, [0.0, 0.0, 0.0, 0.6]));
        vertices.extend(quad(20.0, 20.0, 20.0 + 312.0 * fill, 44.0, [0.3, 0.9, 0.4, 1.0]));

        let mesh = RenderDynamicMesh::new(
            MeshLayout {
                polygon_type: PolygonType::Triangle,
                vertex_format: VertexFormat::Sprite,
                index_format: IndexFormat::U16,
                vertex_count: vertices.len() as u32,
                index_count: 0,
            },
            Sphere::new(Vec3::new(176.0, 32.0, 0.0), 170.0),
            bytemuck::cast_slice::<_, u8>(&vertices).into(),
            Box::default(),
        );
        RenderObject::new(
            self.hud.clone(),
            RenderObjectMesh::Dynamic(Arc::new(mesh)),
            Mat4::IDENTITY,
            RenderLayer::Ui,
        )
        .with_priority(10)
    }
}

fn cube_geometry() -> (Vec<StaticVertex>, Vec<u16>) {
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * 0.5;
            vertices.push(StaticVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: [(su + 1.0) * 0.5, (sv + 1.0) * 0.5],
            });
        }
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

fn main() -> Result<()> {
    init_logging("info");

    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_owned());
    let settings = load_settings(&settings_path)?;
    let mut agent = RenderAgent::new(settings.clone());
    let tasks = WorkerTaskContext::from_settings(&settings);
    log::info!(
        "Sandbox: {} pass compiler on {} workers",
        agent.strategy_name(),
        tasks.worker_count()
    );

    let sender = agent.resource_sender();
    let assets = SceneAssets::load(&sender);

    let processor = RenderCommandProcessor::new(HeadlessBackend::new());
    let submitter = RenderSubmitter::spawn(processor, settings.submission_queue_depth)
        .context("Failed to start the render thread")?;

    for index in 0..FRAME_COUNT {
        let frame = assets.build_frame(&agent, index as f32 * 0.25);
        let buffer = agent.render_frame(&tasks, &frame)?;
        let stats = agent.last_frame_stats();
        log::info!(
            "Sandbox: frame {index}: {} targets, {} passes, {} objects, {} commands, compiled in {:?}",
            stats.target_groups,
            stats.passes,
            stats.pass_objects,
            stats.commands,
            stats.compile_time
        );
        submitter.submit(buffer)?;
    }

    assets.unload(&sender);
    submitter.submit(agent.flush_resources())?;

    let failed = submitter.buffers_failed();
    let processor = submitter.shutdown()?;
    let stats = processor.stats();
    log::info!(
        "Sandbox: {} targets, {} shader binds, {} texture binds, {} mesh binds, {} materials, {} draws",
        stats.targets_begun,
        stats.shader_binds,
        stats.texture_binds,
        stats.mesh_binds,
        stats.material_applications,
        stats.draw_calls
    );
    if failed > 0 {
        anyhow::bail!("{failed} command buffers failed on the render thread");
    }

    let backend = processor.into_backend();
    log::info!(
        "Sandbox: {} backend calls recorded, {} objects still alive",
        backend.calls().len(),
        backend.live_object_count()
    );
    Ok(())
}
