#[cfg(test)]
mod import_to_bake
{
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use glam::{Mat4, Vec3};
    use skin_rsk::*;

    const COLUMNS: u32 = 3;
    const SIDE: u32 = COLUMNS + 1;

    // COLUMNS unit quads along x, vertex (x, y) at index y * SIDE + x. Every quad is split along
    // its rising diagonal, so (x, 0) and (x + 1, 1) are neighbours
    fn strip_vertices() -> Vec<Vertex>
    {
        (0..SIDE * 2)
            .map(|i| Vertex::new(Vec3::new((i % SIDE) as f32, (i / SIDE) as f32, 0.0)).with_normal(Vec3::Z))
            .collect()
    }

    fn strip_faces() -> Vec<Face>
    {
        (0..COLUMNS)
            .flat_map(|bl| [Face::new(bl, bl + 1, bl + SIDE + 1), Face::new(bl, bl + SIDE + 1, bl + SIDE)])
            .collect()
    }

    fn strip_import(vertices: Vec<Vertex>, faces: Vec<Face>) -> ModelImport
    {
        ModelImport
        {
            meshes: vec![MeshImport
            {
                name: "strip".to_string(),
                vertices,
                faces,
                bones: vec![BoneBinding
                {
                    name: "root".to_string(),
                    offset: Mat4::IDENTITY,
                    weights: vec![(0, 1.0)],
                }],
            }],
        }
    }

    fn strip_model() -> Model
    {
        Model::load(strip_import(strip_vertices(), strip_faces()), &PropagationBudget::default()).unwrap()
    }

    #[test]
    fn single_bone_reaches_every_vertex()
    {
        let model = strip_model();
        let mesh = &model.meshes()[0];
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(model.bones().get("root").map(|b| b.id), Some(BoneId(0)));

        for (v, vertex) in mesh.vertices().iter().enumerate()
        {
            assert!(vertex.has_bone(BoneId(0)), "vertex {v} has no candidate");
            assert_eq!(vertex.influences.len(), 1);
        }
        assert_eq!(mesh.vertices()[0].influences[0].weight, 1.0);
        assert!(mesh.vertices()[1..].iter().all(|v| v.total_weight() == 0.0));
    }

    #[test]
    fn decay_follows_the_shortest_path()
    {
        let mut vertices = strip_vertices();
        vertices[0].add_influence(BoneId(0), 1.0);
        let mesh = Mesh::new("strip", vertices, strip_faces()).unwrap();

        let mut propagator = WeightPropagator::new(&mesh, DEFAULT_DECAY_BASE);
        assert_eq!(propagator.run(&PropagationBudget::default(), |_| true), PropagationStatus::Converged);

        // bounds are 3 x 1 x 0
        let diagonal = 10.0f64.sqrt();
        let expected = |path_length: f64| 1.0 / DEFAULT_DECAY_BASE.powf(path_length / diagonal);
        assert_relative_eq!(propagator.weight(1, BoneId(0)), expected(1.0), epsilon = 1e-9);
        assert_relative_eq!(propagator.weight(3, BoneId(0)), expected(3.0), epsilon = 1e-9);
        assert_relative_eq!(propagator.weight(5, BoneId(0)), expected(2.0f64.sqrt()), epsilon = 1e-9);
        // across the top row or along the bottom, one diagonal either way
        assert_relative_eq!(propagator.weight(7, BoneId(0)), expected(2.0 + 2.0f64.sqrt()), epsilon = 1e-9);
        // the falling diagonal is not an edge, so (0, 1) is a straight hop up
        assert_relative_eq!(propagator.weight(4, BoneId(0)), expected(1.0), epsilon = 1e-9);
    }

    #[test]
    fn bake_moves_only_weighted_vertices()
    {
        let model = strip_model();
        let matrices = [Mat4::from_translation(Vec3::X)];
        let baked = SkinningBaker::new(&matrices, DirectionBlend::Linear).bake_model(&model);

        let mesh = &baked.meshes()[0].mesh;
        assert_eq!(mesh.vertices()[0].position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices()[7].position, Vec3::new(3.0, 1.0, 0.0));
        assert!(mesh.vertices().iter().all(|v| v.influences.is_empty()));
        assert_eq!(baked.blend(0, 0), Some(matrices[0]));
        assert_eq!(baked.blend(0, 7), Some(Mat4::IDENTITY));

        // the source is untouched
        assert_eq!(model.meshes()[0].vertices()[0].position, Vec3::ZERO);
    }

    #[test]
    fn identity_pose_bakes_in_place()
    {
        let model = strip_model();
        let matrices = [Mat4::IDENTITY; MAX_BONES];
        let baked = SkinningBaker::new(&matrices, DirectionBlend::Affine).bake_model(&model);

        for (source, baked) in model.meshes()[0].vertices().iter().zip(baked.meshes()[0].mesh.vertices())
        {
            assert_abs_diff_eq!(source.position, baked.position);
            assert_abs_diff_eq!(source.normal, baked.normal);
        }
    }

    #[test]
    fn welding_keeps_the_bound_vertex()
    {
        let mut vertices = strip_vertices();
        vertices.push(Vertex::new(Vec3::ZERO).with_normal(Vec3::Z));
        let mut faces = strip_faces();
        faces[0] = Face::new(8, 1, 5);

        let mut model = Model::load(strip_import(vertices, faces), &PropagationBudget::default()).unwrap();
        assert_eq!(model.weld_vertices(), 1);

        let mesh = &model.meshes()[0];
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.faces()[0].indices, [0, 1, 5]);
        assert_eq!(mesh.vertices()[0].total_weight(), 1.0);
    }
}

#[cfg(test)]
mod playback
{
    use approx::assert_abs_diff_eq;
    use glam::{Mat4, Vec3};
    use anim_rsk::*;
    use nab_rsk::timing::FSeconds;
    use skin_rsk::BoneRegistry;

    // hip at the origin with a knee one unit up, the hip turns one radian per tick
    fn bend() -> (ClipImport, BoneRegistry)
    {
        let mut bones = BoneRegistry::new();
        bones.register("hip", Mat4::IDENTITY).unwrap();
        bones.register("knee", Mat4::from_translation(Vec3::NEG_Y)).unwrap();

        let hip: Box<dyn NodeSampler> = Box::new(|t: f32| Mat4::from_rotation_z(t));
        let import = ClipImport
        {
            name: "bend".to_string(),
            duration: 4.0,
            ticks_per_second: 1.0,
            trim: None,
            root: SkeletonNode::new("hip", Mat4::IDENTITY)
                .with_child(SkeletonNode::new("knee", Mat4::from_translation(Vec3::Y))),
            tracks: vec![("hip".to_string(), hip)],
        };
        (import, bones)
    }

    #[test]
    fn child_follows_parent()
    {
        let (import, bones) = bend();
        let mut animator = Animator::new();
        animator.add_clip(AnimationClip::load(import, &bones).unwrap());
        animator.play();

        animator.update(FSeconds(1.0));
        assert_eq!(animator.current_time(), 1.0);
        let matrices = animator.final_matrices();
        assert_abs_diff_eq!(matrices[0], Mat4::from_rotation_z(1.0), epsilon = 1e-6);
        // knee bind offset cancels its local translation
        assert_abs_diff_eq!(matrices[1], Mat4::from_rotation_z(1.0), epsilon = 1e-6);

        let knee_tip = matrices[1].transform_point3(Vec3::new(0.0, 2.0, 0.0));
        assert_abs_diff_eq!(knee_tip, Vec3::new(-2.0 * 1.0f32.sin(), 2.0 * 1.0f32.cos(), 0.0), epsilon = 1e-5);
    }

    #[test]
    fn wraps_at_the_end()
    {
        let (import, bones) = bend();
        let mut animator = Animator::new();
        animator.add_clip(AnimationClip::load(import, &bones).unwrap());
        animator.play();

        animator.update(FSeconds(3.0));
        animator.update(FSeconds(3.0));
        assert_eq!(animator.current_time(), 2.0);
    }

    #[test]
    fn unknown_track_is_rejected()
    {
        let (mut import, bones) = bend();
        let stray: Box<dyn NodeSampler> = Box::new(|_: f32| Mat4::IDENTITY);
        import.tracks.push(("tail".to_string(), stray));
        assert!(matches!(AnimationClip::load(import, &bones), Err(ClipLoadError::InvalidBoneReference { .. })));
    }
}

#[cfg(test)]
mod editing
{
    use glam::{Mat4, Vec3};
    use edit_rsk::*;
    use math_rsk::Ray;
    use skin_rsk::{Face, Mesh, Vertex};

    fn quad(name: &str, z: f32) -> Mesh
    {
        let vertices = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
            .map(|(x, y)| Vertex::new(Vec3::new(x, y, z)).with_normal(Vec3::Z))
            .to_vec();
        Mesh::new(name, vertices, vec![Face::new(0, 1, 2), Face::new(1, 3, 2)]).unwrap()
    }

    #[test]
    fn nearest_enabled_mesh_wins()
    {
        let mut meshes = vec![quad("back", -1.0), quad("front", 0.0)];
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::NEG_Z);
        let picker = Picker::default();

        let hit = picker.pick(&ray, &meshes).unwrap();
        assert_eq!(hit.mesh_index, 1);
        assert_eq!(hit.face_index, 1);
        assert_eq!(hit.distance, 5.0);

        meshes[1].enabled = false;
        let hit = picker.pick(&ray, &meshes).unwrap();
        assert_eq!(hit.mesh_index, 0);
        assert_eq!(hit.distance, 6.0);

        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(picker.pick(&miss, &meshes).is_none());
    }

    #[test]
    fn new_change_discards_redo()
    {
        let mut meshes = vec![quad("quad", 0.0)];
        let mut history = ChangeStack::default();

        assert!(history.start_change(&[VertexRef::new(0, 0)]));
        assert!(history.modify(&mut meshes[..], Vec3::X));
        assert!(history.end_change());
        assert!(history.undo(&mut meshes[..]));
        assert!(history.can_redo());

        assert!(history.start_change(&[VertexRef::new(0, 1)]));
        assert!(history.modify(&mut meshes[..], Vec3::Y));
        assert!(history.end_change());

        assert_eq!(history.len(), 1);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut meshes[..]));
        assert_eq!(meshes[0].vertices()[0].position, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(meshes[0].vertices()[1].position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn cursor_ray_points_into_the_screen()
    {
        let view_projection = Mat4::orthographic_rh(-2.0, 2.0, -2.0, 2.0, 0.1, 100.0)
            * Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let viewport = glam::Vec2::new(400.0, 400.0);

        let ray = Picker::cursor_ray(glam::Vec2::new(200.0, 200.0), viewport, view_projection, Mat4::IDENTITY).unwrap();
        approx::assert_abs_diff_eq!(ray.direction, Vec3::NEG_Z, epsilon = 1e-5);

        let hit = Picker::default().pick_at(glam::Vec2::new(250.0, 150.0), viewport, view_projection, Mat4::IDENTITY, [&quad("quad", 0.0)]).unwrap();
        approx::assert_abs_diff_eq!(hit.point, Vec3::new(0.5, 0.5, 0.0), epsilon = 1e-4);
    }
}
