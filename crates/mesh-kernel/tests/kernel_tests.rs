use guide_types::primitives::{cuboid, cylinder};
use guide_types::Mesh;
use mesh_kernel::*;
use proptest::prelude::*;

fn kernels() -> Vec<Box<dyn MeshKernel>> {
    vec![Box::new(NativeKernel::new()), Box::new(NullKernel::new())]
}

/// Two meshes concatenated into one, without welding.
fn merged(a: &Mesh, b: &Mesh) -> Mesh {
    let offset = a.point_count() as u32;
    let mut out = a.clone();
    out.points.extend_from_slice(&b.points);
    out.polys.extend(
        b.polys
            .iter()
            .map(|p| p.iter().map(|i| i + offset).collect::<Vec<_>>()),
    );
    out
}

// ── Native kernel ───────────────────────────────────────────────────────────

#[test]
fn guide_body_minus_channel_keeps_outer_extent() {
    let kernel = NativeKernel::new();
    let (body_min, body_max) = ([-10.0, -10.0, 0.0], [10.0, 10.0, 5.0]);
    let body = cuboid(body_min, body_max);
    let channel = cylinder([0.0, 0.0, -1.0], 2.5, 7.0, 32);

    let out = kernel.boolean_difference(&body, &channel).unwrap();
    assert!(out.poly_count() > body.poly_count());
    let bounds = out.bounds().unwrap();
    for k in 0..3 {
        assert!((bounds.min[k] - body_min[k]).abs() < 1e-9);
        assert!((bounds.max[k] - body_max[k]).abs() < 1e-9);
    }
}

#[test]
fn dense_body_minus_channel_cuts_through() {
    let kernel = NativeKernel::new();
    let body = cylinder([0.0; 3], 20.0, 5.0, 700);
    let channel = cuboid([-1.0, -1.0, -1.0], [1.0, 1.0, 6.0]);
    assert!(body.poly_count() >= 1000);

    let out = kernel.boolean_difference(&body, &channel).unwrap();
    assert!(!out.is_empty());
    let bounds = out.bounds().unwrap();
    assert!((bounds.max[0] - 20.0).abs() < 1e-9);
    assert!(bounds.min[2].abs() < 1e-9);
    assert!((bounds.max[2] - 5.0).abs() < 1e-9);
    // The body axis now runs through the channel, so no output point sits on it.
    let off_axis = |p: &[f64; 3]| p[0].abs() >= 1.0 - 1e-9 || p[1].abs() >= 1.0 - 1e-9;
    assert!(out.points.iter().all(off_axis));
}

#[test]
fn overlapping_shells_report_self_intersections() {
    let kernel = NativeKernel::new();
    let mesh = merged(
        &cuboid([0.0; 3], [2.0; 3]),
        &cuboid([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]),
    );
    assert!(kernel.self_intersections(&mesh).unwrap() > 0);
    assert_eq!(
        kernel.self_intersections(&cuboid([0.0; 3], [2.0; 3])).unwrap(),
        0
    );
}

#[test]
fn preprocessing_chain_keeps_box_closed() {
    let kernel = NativeKernel::new();
    let mut mesh = cuboid([0.0; 3], [1.0; 3]);
    mesh.polys.truncate(10);
    // Flip a -x triangle; it has no edge on the open +x side.
    mesh.polys[8].swap(1, 2);

    let mesh = kernel.triangulate(&mesh).unwrap();
    let mesh = kernel.clean(&mesh).unwrap();
    let mesh = kernel.fill_holes(&mesh, 2.0).unwrap();
    let mesh = kernel
        .recompute_normals(&mesh, NormalsOptions::default())
        .unwrap();
    let mesh = kernel.largest_component(&mesh).unwrap();

    assert_eq!(mesh.poly_count(), 12);
    assert!(kernel.feature_edges(&mesh).unwrap().is_empty());
    let normals = mesh.normals.unwrap();
    assert_eq!(normals.len(), 8);
}

#[test]
fn write_mesh_produces_vtp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("channel.vtp");
    let kernel = NativeKernel::new();
    let mesh = kernel
        .recompute_normals(&cylinder([0.0; 3], 1.0, 2.0, 12), NormalsOptions::default())
        .unwrap();
    kernel.write_mesh(&mesh, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains(r#"Name="Normals""#));
    assert!(text.contains(r#"NumberOfPoints="26""#));
}

#[test]
fn weld_tolerance_falls_back_on_bad_input() {
    let mesh = Mesh::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1e-3, 0.0, 0.0]],
        vec![vec![0, 1, 2], vec![3, 1, 2]],
    );
    let coarse = NativeKernel::new().with_weld_tolerance(0.01);
    assert_eq!(coarse.clean(&mesh).unwrap().poly_count(), 1);
    let fallback = NativeKernel::new().with_weld_tolerance(-1.0);
    assert_eq!(fallback.clean(&mesh).unwrap().poly_count(), 2);
}

// ── Null kernel ─────────────────────────────────────────────────────────────

#[test]
fn null_kernel_is_identity_or_unsupported() {
    let kernel = NullKernel::new();
    let mesh = cuboid([0.0; 3], [1.0; 3]);
    assert_eq!(kernel.clean(&mesh).unwrap(), mesh);
    let decimated = kernel.decimate(&mesh, DecimateParams::default()).unwrap();
    assert_eq!(decimated, mesh);
    let err = kernel.boolean_difference(&mesh, &mesh).unwrap_err();
    assert!(err.is_not_supported());
    let err = kernel.self_intersections(&mesh).unwrap_err();
    assert!(err.is_not_supported());
}

#[test]
fn default_kernel_is_native() {
    assert_eq!(default_kernel().name(), "native");
}

// ── Robustness ──────────────────────────────────────────────────────────────

fn arb_mesh() -> impl Strategy<Value = Mesh> {
    (
        prop::collection::vec(prop::array::uniform3(-10.0f64..10.0), 0..12),
        prop::collection::vec(prop::collection::vec(0u32..14, 0..5), 0..10),
    )
        .prop_map(|(points, polys)| Mesh::new(points, polys))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn kernels_never_panic_on_arbitrary_soups(a in arb_mesh(), b in arb_mesh()) {
        for kernel in kernels() {
            let _ = kernel.triangulate(&a);
            let _ = kernel.clean(&a);
            let _ = kernel.fill_holes(&a, 2.0);
            let _ = kernel.recompute_normals(&a, NormalsOptions::default());
            let _ = kernel.largest_component(&a);
            let _ = kernel.decimate(
                &a,
                DecimateParams {
                    target_reduction: 0.5,
                    ..Default::default()
                },
            );
            let _ = kernel.boolean_difference(&a, &b);
            let _ = kernel.feature_edges(&a);
            let _ = kernel.point_normals(&a);
            let _ = kernel.self_intersections(&a);
        }
    }

    #[test]
    fn clean_output_indices_are_valid(a in arb_mesh()) {
        if let Ok(out) = NativeKernel::new().clean(&a) {
            prop_assert!(out.indices_in_range());
            prop_assert!(out.polys.iter().all(|p| p.len() >= 3));
        }
    }
}
