use ember_core::math::{LinearRgba, Mat4, Sphere, UVec2, Vec3};
use ember_core::renderer::api::*;
use ember_core::renderer::{
    BackendError, DirectionalRenderLight, DirectionalShadow, RenderLight, ShadowVolume,
};
use ember_infra::graphics::headless::{BackendCall, HeadlessBackend};
use ember_infra::graphics::{uniforms, ProcessError, RenderCommandProcessor};
use std::sync::Arc;

const VERTEX_SOURCE: &str = "void main() {}";
const FRAGMENT_SOURCE: &str = "void main() {}";

fn triangle_layout() -> MeshLayout {
    MeshLayout {
        polygon_type: PolygonType::Triangle,
        vertex_format: VertexFormat::StaticMesh,
        index_format: IndexFormat::U16,
        vertex_count: 3,
        index_count: 3,
    }
}

fn triangle_mesh() -> (Arc<RenderMesh>, Box<[u8]>, Box<[u8]>) {
    let layout = triangle_layout();
    let mesh = Arc::new(RenderMesh::new(layout, Sphere::new(Vec3::ZERO, 1.0)));
    let vertices = vec![0u8; layout.vertex_count as usize * layout.vertex_format.stride()];
    let indices = vec![0u8; layout.index_count as usize * layout.index_format.size()];
    (mesh, vertices.into_boxed_slice(), indices.into_boxed_slice())
}

struct Scene {
    shader: Arc<RenderShader>,
    material: Arc<RenderMaterial>,
    mesh: Arc<RenderMesh>,
}

impl Scene {
    fn new() -> (Self, RenderCommandList) {
        let shader = Arc::new(RenderShader::new("lit"));
        let material = Arc::new(RenderMaterial::new(shader.clone()));
        let (mesh, vertices, indices) = triangle_mesh();

        let mut loads = RenderCommandList::new();
        loads.add_load_shader(shader.clone(), VERTEX_SOURCE, FRAGMENT_SOURCE);
        loads.add_load_mesh(mesh.clone(), vertices, indices);
        (
            Self {
                shader,
                material,
                mesh,
            },
            loads,
        )
    }
}

fn begin(list: &mut RenderCommandList) {
    list.add_begin(None, UVec2::new(640, 480), LinearRgba::CLEAR_GREY);
    list.add_apply_camera(Vec3::ZERO, Mat4::IDENTITY);
}

fn loaded_processor(loads: RenderCommandList) -> RenderCommandProcessor<HeadlessBackend> {
    let mut processor = RenderCommandProcessor::new(HeadlessBackend::new());
    processor
        .process(RenderCommandBuffer::new(vec![loads]))
        .expect("loading should succeed");
    processor
}

#[test]
fn test_repeated_material_binds_shader_once() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(scene.material.clone());
    frame.add_apply_material(scene.material.clone());
    frame.add_apply_mesh(scene.mesh.clone());
    frame.add_render_instance(Mat4::IDENTITY);
    frame.add_end();

    processor
        .process(RenderCommandBuffer::new(vec![frame]))
        .unwrap();

    let backend = processor.backend();
    assert_eq!(backend.shader_bind_count(), 1);
    assert_eq!(backend.draw_call_count(), 1);
    assert_eq!(processor.stats().material_applications, 1);
    assert_eq!(processor.stats().draw_calls, 1);
}

#[test]
fn test_indexed_and_non_indexed_draws() {
    let shader = Arc::new(RenderShader::new("sprite"));
    let material = Arc::new(RenderMaterial::new(shader.clone()));
    let layout = MeshLayout {
        polygon_type: PolygonType::TriangleStrip,
        vertex_format: VertexFormat::Sprite,
        index_format: IndexFormat::U16,
        vertex_count: 4,
        index_count: 0,
    };
    let strip = Arc::new(RenderMesh::new(layout, Sphere::new(Vec3::ZERO, 1.0)));
    let (indexed, vertices, indices) = triangle_mesh();

    let mut list = RenderCommandList::new();
    list.add_load_shader(shader, VERTEX_SOURCE, FRAGMENT_SOURCE);
    list.add_load_mesh(strip.clone(), vec![0u8; 4 * 36].into_boxed_slice(), Box::new([]));
    list.add_load_mesh(indexed.clone(), vertices, indices);
    begin(&mut list);
    list.add_apply_material(material);
    list.add_apply_mesh(strip);
    list.add_render_instance(Mat4::IDENTITY);
    list.add_apply_mesh(indexed);
    list.add_render_instance(Mat4::IDENTITY);
    list.add_end();

    let mut processor = RenderCommandProcessor::new(HeadlessBackend::new());
    processor.process(RenderCommandBuffer::new(vec![list])).unwrap();

    let draws: Vec<_> = processor
        .backend()
        .calls()
        .iter()
        .filter(|c| matches!(c, BackendCall::Draw { .. } | BackendCall::DrawIndexed { .. }))
        .cloned()
        .collect();
    assert_eq!(
        draws,
        vec![
            BackendCall::Draw {
                polygon_type: PolygonType::TriangleStrip,
                vertex_count: 4,
            },
            BackendCall::DrawIndexed {
                polygon_type: PolygonType::Triangle,
                index_format: IndexFormat::U16,
                index_count: 3,
            },
        ]
    );
}

#[test]
fn test_instance_pushes_per_draw_matrices() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);

    let view_projection = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
    let world = Mat4::from_translation(Vec3::new(1.0, 2.0, -5.0));
    let mut frame = RenderCommandList::new();
    frame.add_begin(None, UVec2::new(64, 64), LinearRgba::BLACK);
    frame.add_apply_camera(Vec3::ZERO, view_projection);
    frame.add_apply_material(scene.material.clone());
    frame.add_apply_mesh(scene.mesh.clone());
    frame.add_render_instance(world);
    frame.add_end();
    processor.process(RenderCommandBuffer::new(vec![frame])).unwrap();

    let find = |name: &str| {
        processor.backend().calls().iter().find_map(|c| match c {
            BackendCall::SetUniform { name: n, value } if n == name => Some(*value),
            _ => None,
        })
    };
    assert_eq!(
        find(uniforms::WVP_MATRIX),
        Some(UniformValue::Mat4(view_projection * world))
    );
    assert_eq!(find(uniforms::WORLD_MATRIX), Some(UniformValue::Mat4(world)));
    assert_eq!(
        find(uniforms::NORMAL_MATRIX),
        Some(UniformValue::Mat4(world.inverse().transpose()))
    );
}

#[test]
fn test_same_mesh_is_not_rebound() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(scene.material.clone());
    for _ in 0..3 {
        frame.add_apply_mesh(scene.mesh.clone());
        frame.add_render_instance(Mat4::IDENTITY);
    }
    frame.add_end();
    processor.process(RenderCommandBuffer::new(vec![frame])).unwrap();

    assert_eq!(processor.backend().mesh_bind_count(), 1);
    assert_eq!(processor.backend().draw_call_count(), 3);
}

#[test]
fn test_material_change_rebinds_mesh_but_keeps_shared_shader() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);
    let second = Arc::new(
        RenderMaterial::new(scene.shader.clone()).with_colours(
            LinearRgba::BLACK,
            LinearRgba::WHITE,
            LinearRgba::rgb(1.0, 0.0, 0.0),
            LinearRgba::WHITE,
        ),
    );

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(scene.material.clone());
    frame.add_apply_mesh(scene.mesh.clone());
    frame.add_render_instance(Mat4::IDENTITY);
    frame.add_apply_material(second);
    frame.add_apply_mesh(scene.mesh.clone());
    frame.add_render_instance(Mat4::IDENTITY);
    frame.add_end();
    processor.process(RenderCommandBuffer::new(vec![frame])).unwrap();

    let backend = processor.backend();
    assert_eq!(backend.shader_bind_count(), 1);
    assert_eq!(backend.mesh_bind_count(), 2);
    assert_eq!(processor.stats().material_applications, 2);
}

#[test]
fn test_end_resets_binding_state() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);

    let mut frame = RenderCommandList::new();
    for _ in 0..2 {
        begin(&mut frame);
        frame.add_apply_material(scene.material.clone());
        frame.add_apply_mesh(scene.mesh.clone());
        frame.add_render_instance(Mat4::IDENTITY);
        frame.add_end();
    }
    processor.process(RenderCommandBuffer::new(vec![frame])).unwrap();

    assert!(processor.state().shader.is_none());
    assert!(processor.state().material.is_none());
    assert_eq!(processor.backend().shader_bind_count(), 2);
    assert_eq!(processor.stats().targets_begun, 2);
}

#[test]
fn test_apply_light_reapplies_material() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);
    let light = RenderLight::Directional(DirectionalRenderLight::new(
        LinearRgba::WHITE,
        Vec3::NEG_Y,
    ));

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(scene.material.clone());
    frame.add_apply_mesh(scene.mesh.clone());
    frame.add_render_instance(Mat4::IDENTITY);
    frame.add_apply_light(light);
    frame.add_apply_material(scene.material.clone());
    frame.add_apply_mesh(scene.mesh.clone());
    frame.add_render_instance(Mat4::IDENTITY);
    frame.add_end();
    processor.process(RenderCommandBuffer::new(vec![frame])).unwrap();

    let backend = processor.backend();
    assert_eq!(processor.stats().material_applications, 2);
    assert_eq!(backend.shader_bind_count(), 1);
    assert_eq!(
        backend.count(|c| matches!(
            c,
            BackendCall::SetUniform { name, .. } if name == uniforms::LIGHT_DIRECTION
        )),
        1
    );
}

#[test]
fn test_shadowed_light_binds_shadow_map() {
    let (scene, mut loads) = Scene::new();
    let depth = Arc::new(RenderTexture::new(TextureDescriptor::depth(UVec2::splat(256))));
    let target = Arc::new(RenderTargetGroup::depth_only(depth.clone()));
    loads.add_load_texture(depth.clone(), None);
    loads.add_load_target_group(target.clone());
    let mut processor = loaded_processor(loads);

    let light = DirectionalRenderLight::new(LinearRgba::WHITE, Vec3::NEG_Y).with_shadow(
        DirectionalShadow {
            target,
            light_world_matrix: Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0)),
            volume: ShadowVolume::default(),
            tolerance: 0.005,
        },
    );
    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_light(RenderLight::Directional(light));
    frame.add_apply_material(scene.material.clone());
    frame.add_end();
    processor.process(RenderCommandBuffer::new(vec![frame])).unwrap();

    assert_eq!(
        processor.backend().count(|c| matches!(
            c,
            BackendCall::BindTexture {
                slot: ember_infra::graphics::SHADOW_MAP_TEXTURE_SLOT,
                ..
            }
        )),
        1
    );
}

#[test]
fn test_render_instance_without_mesh_fails() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(scene.material.clone());
    frame.add_render_instance(Mat4::IDENTITY);
    frame.add_end();

    let result = processor.process(RenderCommandBuffer::new(vec![frame]));
    assert_eq!(result, Err(ProcessError::NoMeshBound));
    assert!(processor.state().material.is_none());
    assert_eq!(processor.backend().draw_call_count(), 0);
}

#[test]
fn test_mesh_without_shader_fails() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_mesh(scene.mesh.clone());
    let result = processor.process(RenderCommandBuffer::new(vec![frame]));
    assert_eq!(result, Err(ProcessError::NoShaderBound(scene.mesh.id())));
}

#[test]
fn test_material_with_unloaded_shader_fails() {
    let shader = Arc::new(RenderShader::new("never loaded"));
    let material = Arc::new(RenderMaterial::new(shader.clone()));
    let mut processor = RenderCommandProcessor::new(HeadlessBackend::new());

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(material);
    let result = processor.process(RenderCommandBuffer::new(vec![frame]));
    assert!(matches!(
        result,
        Err(ProcessError::ResourceNotLoaded { id, .. }) if id == shader.id()
    ));
}

#[test]
fn test_unknown_custom_uniform_is_reported() {
    let (scene, loads) = Scene::new();
    let material = Arc::new(
        RenderMaterial::new(scene.shader.clone()).with_uniform("u_tint", UniformValue::Float(0.5)),
    );
    let mut processor = RenderCommandProcessor::new(HeadlessBackend::with_known_uniforms([
        uniforms::DIFFUSE,
        uniforms::WVP_MATRIX,
    ]));
    processor.process(RenderCommandBuffer::new(vec![loads])).unwrap();

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(material);
    let result = processor.process(RenderCommandBuffer::new(vec![frame]));
    assert_eq!(
        result,
        Err(ProcessError::Backend(BackendError::UniformNotFound {
            name: "u_tint".to_owned()
        }))
    );
}

#[test]
fn test_dynamic_mesh_is_released_at_end() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);
    let live_after_load = processor.backend().live_object_count();

    let layout = MeshLayout {
        polygon_type: PolygonType::Triangle,
        vertex_format: VertexFormat::Sprite,
        index_format: IndexFormat::U16,
        vertex_count: 6,
        index_count: 0,
    };
    let sprites = Arc::new(RenderDynamicMesh::new(
        layout,
        Sphere::new(Vec3::ZERO, 1.0),
        vec![0u8; 6 * 36].into_boxed_slice(),
        Box::new([]),
    ));

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(scene.material.clone());
    frame.add_apply_dynamic_mesh(sprites.clone());
    frame.add_render_instance(Mat4::IDENTITY);
    frame.add_apply_dynamic_mesh(sprites);
    frame.add_render_instance(Mat4::IDENTITY);
    frame.add_end();
    processor.process(RenderCommandBuffer::new(vec![frame])).unwrap();

    let backend = processor.backend();
    assert_eq!(backend.mesh_bind_count(), 1);
    assert_eq!(backend.draw_call_count(), 2);
    assert_eq!(backend.live_object_count(), live_after_load);
    assert_eq!(backend.created_count(), 3);
}

#[test]
fn test_unload_releases_and_forgets_resources() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);
    assert_eq!(processor.registry().len(), 2);

    let mut unloads = RenderCommandList::new();
    unloads.add_unload_mesh(scene.mesh.clone());
    unloads.add_unload_shader(scene.shader.clone());
    processor.process(RenderCommandBuffer::new(vec![unloads])).unwrap();

    assert!(processor.registry().is_empty());
    assert_eq!(processor.backend().live_object_count(), 0);

    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(scene.material.clone());
    assert!(matches!(
        processor.process(RenderCommandBuffer::new(vec![frame])),
        Err(ProcessError::ResourceNotLoaded { .. })
    ));
}

#[test]
fn test_failed_frame_still_runs_trailing_unloads() {
    let (mesh, vertices, indices) = triangle_mesh();
    let mut loads = RenderCommandList::new();
    loads.add_load_mesh(mesh.clone(), vertices, indices);
    let mut processor = loaded_processor(loads);
    assert_eq!(processor.registry().len(), 1);

    let missing = Arc::new(RenderMaterial::new(Arc::new(RenderShader::new("never loaded"))));
    let mut frame = RenderCommandList::new();
    begin(&mut frame);
    frame.add_apply_material(missing);
    frame.add_end();
    let mut unloads = RenderCommandList::new();
    unloads.add_unload_mesh(mesh);

    let result = processor.process(RenderCommandBuffer::new(vec![frame, unloads]));

    assert!(matches!(result, Err(ProcessError::ResourceNotLoaded { .. })));
    assert!(processor.registry().is_empty());
    assert_eq!(processor.backend().live_object_count(), 0);
}

#[test]
fn test_failed_frame_ends_target_and_skips_later_draws() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);

    let mut first = RenderCommandList::new();
    begin(&mut first);
    first.add_apply_mesh(scene.mesh.clone());
    first.add_render_instance(Mat4::IDENTITY);
    first.add_end();
    let mut second = RenderCommandList::new();
    begin(&mut second);
    second.add_apply_material(scene.material.clone());
    second.add_apply_mesh(scene.mesh.clone());
    second.add_render_instance(Mat4::IDENTITY);
    second.add_end();

    let result = processor.process(RenderCommandBuffer::new(vec![first, second]));

    assert_eq!(result, Err(ProcessError::NoShaderBound(scene.mesh.id())));
    let backend = processor.backend();
    assert_eq!(backend.count(|c| matches!(c, BackendCall::Begin { .. })), 1);
    assert_eq!(backend.count(|c| matches!(c, BackendCall::End)), 1);
    assert_eq!(backend.draw_call_count(), 0);
    assert!(processor.state().shader.is_none());

    // The next buffer starts from a clean slate.
    let mut retry = RenderCommandList::new();
    begin(&mut retry);
    retry.add_apply_material(scene.material.clone());
    retry.add_apply_mesh(scene.mesh.clone());
    retry.add_render_instance(Mat4::IDENTITY);
    retry.add_end();
    processor.process(RenderCommandBuffer::new(vec![retry])).unwrap();
    assert_eq!(processor.backend().draw_call_count(), 1);
}

#[test]
fn test_reloading_replaces_previous_upload() {
    let (scene, loads) = Scene::new();
    let mut processor = loaded_processor(loads);

    let mut reload = RenderCommandList::new();
    reload.add_load_shader(scene.shader.clone(), VERTEX_SOURCE, FRAGMENT_SOURCE);
    processor.process(RenderCommandBuffer::new(vec![reload])).unwrap();

    assert_eq!(processor.registry().len(), 2);
    assert_eq!(processor.backend().live_object_count(), 2);
    assert_eq!(processor.backend().destroyed_count(), 1);
}

#[test]
fn test_into_backend_releases_leaked_resources() {
    let (_scene, loads) = Scene::new();
    let processor = loaded_processor(loads);
    let backend = processor.into_backend();
    assert_eq!(backend.live_object_count(), 0);
}

#[test]
fn test_offscreen_target_begin() {
    let colour = Arc::new(RenderTexture::new(TextureDescriptor::colour(UVec2::new(320, 200))));
    let depth = Arc::new(RenderTexture::new(TextureDescriptor::depth(UVec2::new(320, 200))));
    let target = Arc::new(RenderTargetGroup::new(Some(colour.clone()), Some(depth.clone())));

    let mut list = RenderCommandList::new();
    list.add_load_texture(colour, None);
    list.add_load_texture(depth, None);
    list.add_load_target_group(target.clone());
    list.add_begin(Some(target.clone()), target.resolution(), LinearRgba::BLACK);
    list.add_end();

    let mut processor = RenderCommandProcessor::new(HeadlessBackend::new());
    processor.process(RenderCommandBuffer::new(vec![list])).unwrap();

    let begin = processor
        .backend()
        .calls()
        .iter()
        .find(|c| matches!(c, BackendCall::Begin { .. }))
        .cloned();
    assert!(matches!(
        begin,
        Some(BackendCall::Begin { target: Some(_), viewport, .. }) if viewport == UVec2::new(320, 200)
    ));
}

#[test]
fn test_begin_with_unloaded_target_fails() {
    let depth = Arc::new(RenderTexture::new(TextureDescriptor::depth(UVec2::splat(64))));
    let target = Arc::new(RenderTargetGroup::depth_only(depth));
    let mut list = RenderCommandList::new();
    list.add_begin(Some(target), UVec2::splat(64), LinearRgba::BLACK);

    let mut processor = RenderCommandProcessor::new(HeadlessBackend::new());
    assert!(processor.process(RenderCommandBuffer::new(vec![list])).is_err());
    assert_eq!(processor.stats().targets_begun, 0);
}
