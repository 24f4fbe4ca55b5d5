mod common;

use common::*;
use ember_core::math::{LinearRgba, Mat4, Vec3};
use ember_core::renderer::api::*;
use ember_core::renderer::{
    DirectionalRenderLight, PointRenderLight, RenderLight, RenderSettings, ShadowCulling,
};
use ember_core::{InlineTaskContext, TaskContext};
use ember_infra::task::WorkerTaskContext;
use ember_lanes::render_lane::{ForwardRenderPassCompiler, RenderPassCompiler};
use ember_lanes::CompileError;

fn compile<'f>(
    compiler: &ForwardRenderPassCompiler,
    frame: &'f RenderFrame,
) -> Vec<TargetRenderPassGroup<'f>> {
    compiler
        .compile_target_render_pass_groups(&InlineTaskContext, frame)
        .expect("frame should compile")
}

fn scene_group<'a, 'f>(groups: &'a [TargetRenderPassGroup<'f>]) -> &'a CameraRenderPassGroup<'f> {
    &groups.last().unwrap().camera_groups()[0]
}

fn positions(pass: &RenderPass<'_>) -> Vec<Vec3> {
    pass.objects()
        .iter()
        .map(|o| o.world_matrix.w_axis.truncate())
        .collect()
}

/// Flattens groups into comparable data: target, camera and per-pass
/// light kind with (material, mesh, position) per object.
fn summary(groups: &[TargetRenderPassGroup<'_>]) -> Vec<String> {
    let mut out = Vec::new();
    for group in groups {
        out.push(format!("target {:?}", group.target().map(|t| t.id())));
        for camera_group in group.camera_groups() {
            out.push(format!("camera {:?}", camera_group.camera().view_projection()));
            for pass in camera_group.passes() {
                let light = match pass.light() {
                    None => "none",
                    Some(RenderLight::Ambient(_)) => "ambient",
                    Some(RenderLight::Directional(_)) => "directional",
                    Some(RenderLight::Point(_)) => "point",
                };
                out.push(format!("pass {light}"));
                for object in pass.objects() {
                    out.push(format!(
                        "{:?} {:?} {:?}",
                        object.material.id(),
                        object.mesh.id(),
                        object.world_matrix
                    ));
                }
            }
        }
    }
    out
}

#[test]
fn test_single_opaque_object_with_ambient_only() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, -10.0)));

    let compiler = ForwardRenderPassCompiler::default();
    let groups = compile(&compiler, &frame);

    assert_eq!(groups.len(), 1);
    assert!(groups[0].target().is_none());
    assert_eq!(groups[0].camera_groups().len(), 2);

    let scene = scene_group(&groups);
    assert_eq!(scene.camera(), &frame.camera);
    assert_eq!(scene.passes().len(), ForwardRenderPassCompiler::scene_pass_count(&frame));
    assert_eq!(scene.passes().len(), 2);

    let base = &scene.passes()[0];
    assert_eq!(base.objects().len(), 1);
    assert!(matches!(base.light(), Some(RenderLight::Ambient(a)) if *a == frame.ambient_light));
    let expected = materials
        .opaque
        .get(VertexFormat::StaticMesh, ForwardRenderPass::Base)
        .unwrap();
    assert_eq!(base.objects()[0].material.id(), expected.id());

    let transparent = scene.passes().last().unwrap();
    assert!(transparent.objects().is_empty());

    let ui = &groups[0].camera_groups()[1];
    assert!(ui.passes().is_empty());
    assert!(ui.camera().is_orthographic());
}

#[test]
fn test_ui_pass_is_ordered_by_priority() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(ui_object(&materials.ui, Vec3::new(100.0, 100.0, 0.0), 32.0, 5));
    frame
        .render_objects
        .push(ui_object(&materials.ui, Vec3::new(200.0, 100.0, 0.0), 32.0, 1));

    let groups = compile(&ForwardRenderPassCompiler::default(), &frame);
    let ui = &groups[0].camera_groups()[1];

    assert_eq!(ui.passes().len(), 1);
    let priorities: Vec<i32> = ui.passes()[0].objects().iter().map(|o| o.priority).collect();
    assert_eq!(priorities, vec![1, 5]);
    assert_eq!(positions(&ui.passes()[0])[0], Vec3::new(200.0, 100.0, 0.0));
    assert!(matches!(ui.passes()[0].light(), Some(RenderLight::Ambient(_))));

    // UI objects never reach the scene passes.
    let scene = scene_group(&groups);
    assert!(scene.passes().iter().all(|p| p.objects().is_empty()));
}

#[test]
fn test_point_light_only_lists_objects_in_range() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(-6.0, 0.0, -10.0)));
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(6.0, 0.0, -10.0)));
    frame.point_lights.push(PointRenderLight::new(
        LinearRgba::WHITE,
        Vec3::new(-6.0, 2.0, -10.0),
        3.0,
    ));

    let groups = compile(&ForwardRenderPassCompiler::default(), &frame);
    let scene = scene_group(&groups);
    assert_eq!(scene.passes().len(), 3);

    let base = &scene.passes()[0];
    let point = &scene.passes()[1];
    assert_eq!(base.objects().len(), 2);
    assert_eq!(positions(point), vec![Vec3::new(-6.0, 0.0, -10.0)]);
    assert!(matches!(point.light(), Some(RenderLight::Point(l)) if l.range == 3.0));
}

#[test]
fn test_scene_pass_order_follows_lights() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, -10.0)));
    frame
        .directional_lights
        .push(DirectionalRenderLight::new(LinearRgba::WHITE, Vec3::NEG_Y));
    frame
        .directional_lights
        .push(DirectionalRenderLight::new(LinearRgba::rgb(1.0, 0.5, 0.0), Vec3::X));
    frame.point_lights.push(PointRenderLight::new(
        LinearRgba::WHITE,
        Vec3::new(0.0, 0.0, -10.0),
        5.0,
    ));

    let groups = compile(&ForwardRenderPassCompiler::default(), &frame);
    let kinds: Vec<&str> = scene_group(&groups)
        .passes()
        .iter()
        .map(|p| match p.light() {
            Some(RenderLight::Ambient(_)) => "ambient",
            Some(RenderLight::Directional(_)) => "directional",
            Some(RenderLight::Point(_)) => "point",
            None => "none",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["ambient", "directional", "directional", "point", "ambient"]
    );

    let directional = &scene_group(&groups).passes()[2];
    assert!(matches!(
        directional.light(),
        Some(RenderLight::Directional(l)) if l.direction == Vec3::X
    ));
}

#[test]
fn test_objects_outside_the_frustum_are_excluded() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, 25.0)));
    frame
        .render_objects
        .push(object_at(&materials.transparent, Vec3::new(0.0, 0.0, -300.0)));

    let groups = compile(&ForwardRenderPassCompiler::default(), &frame);
    assert_eq!(groups[0].pass_object_count(), 0);
}

#[test]
fn test_transparent_objects_skip_opaque_passes() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.transparent, Vec3::new(0.0, 0.0, -5.0)));
    frame
        .render_objects
        .push(object_at(&materials.transparent, Vec3::new(0.0, 0.0, -15.0)));
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(1.0, 0.0, -8.0)));

    let groups = compile(&ForwardRenderPassCompiler::default(), &frame);
    let scene = scene_group(&groups);
    assert_eq!(positions(&scene.passes()[0]), vec![Vec3::new(1.0, 0.0, -8.0)]);
    assert_eq!(
        positions(scene.passes().last().unwrap()),
        vec![Vec3::new(0.0, 0.0, -15.0), Vec3::new(0.0, 0.0, -5.0)]
    );
}

#[test]
fn test_ui_object_without_transparent_material_fails() {
    let materials = Materials::new();
    let mut frame = frame();
    let object = ui_object(&materials.unlit_ui, Vec3::new(50.0, 50.0, 0.0), 16.0, 0);
    let mesh_id = object.mesh().id();
    frame.render_objects.push(object);

    let result = ForwardRenderPassCompiler::default()
        .compile_target_render_pass_groups(&InlineTaskContext, &frame);
    assert_eq!(
        result.err(),
        Some(CompileError::MissingUiMaterial {
            mesh: mesh_id,
            vertex_format: VertexFormat::Sprite,
        })
    );
}

#[test]
fn test_each_shadow_light_gets_a_leading_target_group() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, -10.0)));
    let first = shadowed_sun();
    let second = shadowed_sun();
    let targets = [
        first.shadow_target().unwrap().id(),
        second.shadow_target().unwrap().id(),
    ];
    frame.directional_lights.push(first);
    frame
        .directional_lights
        .push(DirectionalRenderLight::new(LinearRgba::WHITE, Vec3::NEG_X));
    frame.directional_lights.push(second);

    let compiler = ForwardRenderPassCompiler::default();
    let groups = compile(&compiler, &frame);

    assert_eq!(groups.len(), 3);
    assert_eq!(compiler.target_count(&frame), 3);
    for (group, target) in groups.iter().zip(targets) {
        assert_eq!(group.target().map(|t| t.id()), Some(target));
        assert_eq!(group.camera_groups().len(), 1);
        let passes = group.camera_groups()[0].passes();
        assert_eq!(passes.len(), 1);
        assert!(passes[0].light().is_none());
        assert_eq!(passes[0].objects().len(), 1);
        assert_eq!(
            passes[0].objects()[0].material.shader().id(),
            materials.shadow_shader.id()
        );
    }
    assert!(groups[2].target().is_none());

    // Shadowed lights use the shadow-sampling material in the main pass.
    let scene = scene_group(&groups);
    let shadowed = materials
        .opaque
        .get(VertexFormat::StaticMesh, ForwardRenderPass::DirectionalLightShadows)
        .unwrap();
    let unshadowed = materials
        .opaque
        .get(VertexFormat::StaticMesh, ForwardRenderPass::DirectionalLight)
        .unwrap();
    let pass_materials: Vec<_> = scene.passes()[1..4]
        .iter()
        .map(|p| p.objects()[0].material.id())
        .collect();
    assert_eq!(
        pass_materials,
        vec![shadowed.id(), unshadowed.id(), shadowed.id()]
    );
}

#[test]
fn test_shadow_pass_excludes_transparent_and_non_casting_objects() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, -10.0)));
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(2.0, 0.0, -10.0)).with_shadows(false));
    frame
        .render_objects
        .push(object_at(&materials.transparent, Vec3::new(-2.0, 0.0, -10.0)));
    frame
        .render_objects
        .push(ui_object(&materials.ui, Vec3::new(400.0, 300.0, 0.0), 16.0, 0));
    frame.directional_lights.push(shadowed_sun());

    let groups = compile(&ForwardRenderPassCompiler::default(), &frame);
    let shadow_pass = &groups[0].camera_groups()[0].passes()[0];
    assert_eq!(positions(shadow_pass), vec![Vec3::new(0.0, 0.0, -10.0)]);
}

#[test]
fn test_shadow_culling_against_light_volume() {
    let materials = Materials::new();
    let mut frame = frame();
    // Behind the main camera but inside the light's volume.
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, 2.0)));
    // In front of the main camera but outside the light's volume.
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, -60.0)));
    let sun = shadowed_sun();
    let light_camera = sun.shadow.as_ref().unwrap().camera();
    frame.directional_lights.push(sun);

    let groups = compile(&ForwardRenderPassCompiler::default(), &frame);
    let shadow_group = &groups[0].camera_groups()[0];
    assert_eq!(shadow_group.camera(), &light_camera);
    assert_eq!(
        positions(&shadow_group.passes()[0]),
        vec![Vec3::new(0.0, 0.0, 2.0)]
    );
}

#[test]
fn test_shadow_culling_against_main_camera() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, 2.0)));
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, -60.0)));
    frame.directional_lights.push(shadowed_sun());

    let settings = RenderSettings {
        shadow_culling: ShadowCulling::MainCamera,
        ..RenderSettings::default()
    };
    let groups = compile(&ForwardRenderPassCompiler::new(&settings), &frame);
    let shadow_group = &groups[0].camera_groups()[0];
    assert_eq!(shadow_group.camera(), &RenderCamera::default());
    assert_eq!(
        positions(&shadow_group.passes()[0]),
        vec![Vec3::new(0.0, 0.0, -60.0)]
    );
}

#[test]
fn test_disabled_shadows_produce_no_shadow_targets() {
    let materials = Materials::new();
    let mut frame = frame();
    frame
        .render_objects
        .push(object_at(&materials.opaque, Vec3::new(0.0, 0.0, -10.0)));
    frame.directional_lights.push(shadowed_sun());

    let settings = RenderSettings {
        shadows_enabled: false,
        ..RenderSettings::default()
    };
    let compiler = ForwardRenderPassCompiler::new(&settings);
    let groups = compile(&compiler, &frame);

    assert_eq!(groups.len(), 1);
    assert_eq!(compiler.target_count(&frame), 1);
    let pass = &scene_group(&groups).passes()[1];
    assert!(matches!(pass.light(), Some(RenderLight::Directional(l)) if l.shadow.is_none()));
    let unshadowed = materials
        .opaque
        .get(VertexFormat::StaticMesh, ForwardRenderPass::DirectionalLight)
        .unwrap();
    assert_eq!(pass.objects()[0].material.id(), unshadowed.id());
}

#[test]
fn test_offscreen_main_target_is_kept() {
    let mut frame = frame();
    let target = shadow_target();
    frame.target = Some(target.clone());

    let groups = compile(&ForwardRenderPassCompiler::default(), &frame);
    assert_eq!(groups[0].target().map(|t| t.id()), Some(target.id()));
}

#[test]
fn test_compilation_is_idempotent_and_thread_independent() {
    let materials = Materials::new();
    let mut frame = frame();
    for i in 0..40 {
        let x = (i % 8) as f32 * 3.0 - 12.0;
        let z = -5.0 - (i / 8) as f32 * 6.0;
        let group = if i % 5 == 0 {
            &materials.transparent
        } else {
            &materials.opaque
        };
        frame.render_objects.push(object_at(group, Vec3::new(x, 0.0, z)));
    }
    for i in 0..6 {
        frame.render_objects.push(ui_object(
            &materials.ui,
            Vec3::new(60.0 * i as f32, 40.0, 0.0),
            24.0,
            6 - i,
        ));
    }
    frame.directional_lights.push(shadowed_sun());
    frame.point_lights.push(PointRenderLight::new(
        LinearRgba::WHITE,
        Vec3::new(0.0, 1.0, -12.0),
        8.0,
    ));

    let settings = RenderSettings {
        visibility_batch_size: 4,
        ..RenderSettings::default()
    };
    let compiler = ForwardRenderPassCompiler::new(&settings);
    let workers = WorkerTaskContext::new(4);
    let contexts: [&dyn TaskContext; 2] = [&InlineTaskContext, &workers];

    let reference = summary(&compile(&compiler, &frame));
    for context in contexts {
        for _ in 0..3 {
            let groups = compiler
                .compile_target_render_pass_groups(context, &frame)
                .unwrap();
            assert_eq!(summary(&groups), reference);
        }
    }
}

#[test]
fn test_usable_as_a_trait_object() {
    let compiler: Box<dyn RenderPassCompiler> = Box::new(ForwardRenderPassCompiler::default());
    assert_eq!(compiler.strategy_name(), "Forward");

    let frame = RenderFrame::new(RESOLUTION, RenderCamera::new(Mat4::IDENTITY, Mat4::IDENTITY));
    let groups = compiler
        .compile_target_render_pass_groups(&InlineTaskContext, &frame)
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].pass_count(), 2);
}
