#![allow(dead_code)]

use ember_core::math::{LinearRgba, Mat4, Quat, Sphere, UVec2, Vec3};
use ember_core::renderer::api::*;
use ember_core::renderer::{DirectionalRenderLight, DirectionalShadow, ShadowVolume};
use std::sync::Arc;

pub const RESOLUTION: UVec2 = UVec2::new(800, 600);

/// Shaders and materials shared by the scene fixtures.
pub struct Materials {
    pub lit_shader: Arc<RenderShader>,
    pub shadow_shader: Arc<RenderShader>,
    pub opaque: Arc<RenderMaterialGroup>,
    pub transparent: Arc<RenderMaterialGroup>,
    pub ui: Arc<RenderMaterialGroup>,
    pub unlit_ui: Arc<RenderMaterialGroup>,
}

impl Materials {
    pub fn new() -> Self {
        let lit_shader = Arc::new(RenderShader::new("lit"));
        let shadow_shader = Arc::new(RenderShader::new("shadow"));
        let glass_shader = Arc::new(RenderShader::new("glass"));
        let sprite_shader = Arc::new(RenderShader::new("sprite"));

        let material = |shader: &Arc<RenderShader>| Arc::new(RenderMaterial::new(shader.clone()));
        let opaque = RenderMaterialGroup::new()
            .with_material(VertexFormat::StaticMesh, ForwardRenderPass::Base, material(&lit_shader))
            .with_material(
                VertexFormat::StaticMesh,
                ForwardRenderPass::DirectionalLight,
                material(&lit_shader),
            )
            .with_material(
                VertexFormat::StaticMesh,
                ForwardRenderPass::DirectionalLightShadows,
                material(&lit_shader),
            )
            .with_material(
                VertexFormat::StaticMesh,
                ForwardRenderPass::PointLight,
                material(&lit_shader),
            )
            .with_material(
                VertexFormat::StaticMesh,
                ForwardRenderPass::ShadowMap,
                Arc::new(
                    RenderMaterial::new(shadow_shader.clone())
                        .with_render_state(MaterialRenderState::shadow_map()),
                ),
            );

        let glass = Arc::new(
            RenderMaterial::new(glass_shader).with_render_state(MaterialRenderState::transparent()),
        );
        let transparent = RenderMaterialGroup::new()
            .with_material(VertexFormat::StaticMesh, ForwardRenderPass::Transparent, glass.clone())
            // A transparent object still declaring a shadow material must not cast shadows.
            .with_material(VertexFormat::StaticMesh, ForwardRenderPass::ShadowMap, glass);

        let ui = RenderMaterialGroup::new().with_material(
            VertexFormat::Sprite,
            ForwardRenderPass::Transparent,
            Arc::new(
                RenderMaterial::new(sprite_shader.clone())
                    .with_render_state(MaterialRenderState::transparent()),
            ),
        );
        let unlit_ui = RenderMaterialGroup::new().with_material(
            VertexFormat::Sprite,
            ForwardRenderPass::Base,
            Arc::new(RenderMaterial::new(sprite_shader)),
        );

        Self {
            lit_shader,
            shadow_shader,
            opaque: Arc::new(opaque),
            transparent: Arc::new(transparent),
            ui: Arc::new(ui),
            unlit_ui: Arc::new(unlit_ui),
        }
    }
}

pub fn static_mesh(radius: f32) -> RenderObjectMesh {
    let layout = MeshLayout {
        polygon_type: PolygonType::Triangle,
        vertex_format: VertexFormat::StaticMesh,
        index_format: IndexFormat::U16,
        vertex_count: 24,
        index_count: 36,
    };
    RenderObjectMesh::Static(Arc::new(RenderMesh::new(
        layout,
        Sphere::new(Vec3::ZERO, radius),
    )))
}

pub fn sprite_mesh() -> RenderObjectMesh {
    let layout = MeshLayout {
        polygon_type: PolygonType::TriangleStrip,
        vertex_format: VertexFormat::Sprite,
        index_format: IndexFormat::U16,
        vertex_count: 4,
        index_count: 0,
    };
    RenderObjectMesh::Static(Arc::new(RenderMesh::new(
        layout,
        Sphere::new(Vec3::ZERO, 0.5),
    )))
}

pub fn object_at(group: &Arc<RenderMaterialGroup>, position: Vec3) -> RenderObject {
    RenderObject::new(
        group.clone(),
        static_mesh(1.0),
        Mat4::from_translation(position),
        RenderLayer::Standard,
    )
}

/// A UI quad `size` pixels across with its centre at `pixel`.
pub fn ui_object(group: &Arc<RenderMaterialGroup>, pixel: Vec3, size: f32, priority: i32) -> RenderObject {
    RenderObject::new(
        group.clone(),
        sprite_mesh(),
        Mat4::from_scale_rotation_translation(Vec3::splat(size), Quat::IDENTITY, pixel),
        RenderLayer::Ui,
    )
    .with_priority(priority)
}

/// A camera at the origin looking down negative Z.
pub fn main_camera() -> RenderCamera {
    RenderCamera::perspective(
        Mat4::IDENTITY,
        60f32.to_radians(),
        RESOLUTION.x as f32 / RESOLUTION.y as f32,
        0.1,
        100.0,
    )
}

pub fn frame() -> RenderFrame {
    RenderFrame::new(RESOLUTION, main_camera())
}

pub fn shadow_target() -> Arc<RenderTargetGroup> {
    let depth = Arc::new(RenderTexture::new(TextureDescriptor::depth(UVec2::splat(1024))));
    Arc::new(RenderTargetGroup::depth_only(depth))
}

/// A sun shining straight down, its shadow camera 20 units above the
/// origin and looking down.
pub fn shadowed_sun() -> DirectionalRenderLight {
    let eye = Vec3::new(0.0, 20.0, -10.0);
    let light_world_matrix = Mat4::look_at_rh(eye, Vec3::new(0.0, 0.0, -10.0), Vec3::NEG_Z).inverse();
    DirectionalRenderLight::new(LinearRgba::WHITE, Vec3::NEG_Y).with_shadow(DirectionalShadow {
        target: shadow_target(),
        light_world_matrix,
        volume: ShadowVolume::default(),
        tolerance: 0.005,
    })
}
