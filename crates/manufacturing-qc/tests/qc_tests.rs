use guide_types::primitives::{cuboid, cylinder};
use guide_types::{Implant, Mesh};
use manufacturing_qc::*;
use mesh_kernel::{MeshKernel, NativeKernel, NullKernel};
use proptest::prelude::*;

fn guide() -> Mesh {
    cuboid([0.0; 3], [30.0, 30.0, 5.0])
}

fn spaced_implants() -> Vec<Implant> {
    vec![Implant::new([5.0, 5.0, 0.0]), Implant::new([20.0, 5.0, 0.0])]
}

#[test]
fn collision_scenario() {
    let implants = [Implant::new([0.0, 0.0, 0.0]), Implant::new([3.0, 0.0, 0.0])];
    let kernel = NullKernel::new();
    let summary = qc_summary(&kernel, Some(&guide()), &implants, &QcConfig::default());
    assert!(!summary.sleeve_collision.passes);
    assert_eq!(summary.sleeve_collision.collisions[0].distance, 3.0);
    assert!(!summary.passes);
    assert!(!summary.flags()["sleeve_collision"]);
}

#[test]
fn passing_guide() {
    // The null kernel has no normals, so the undercut check fails open.
    let summary = qc_summary(
        &NullKernel::new(),
        Some(&guide()),
        &spaced_implants(),
        &QcConfig::default(),
    );
    assert!(summary.passes, "{summary:?}");
    assert!(summary.flags().values().all(|p| *p));
}

#[test]
fn overall_is_conjunction() {
    let summary = qc_summary(
        &NativeKernel::new(),
        Some(&guide()),
        &spaced_implants(),
        &QcConfig::default(),
    );
    let flags = summary.flags();
    assert_eq!(
        flags.keys().copied().collect::<Vec<_>>(),
        [
            "minimum_thickness",
            "printable_orientation",
            "sleeve_collision",
            "undercut"
        ]
    );
    assert_eq!(summary.passes, flags.values().all(|p| *p));
    assert!(!flags["undercut"]);
}

#[test]
fn absent_guide_fails_geometry_checks_only() {
    let summary = qc_summary(&NativeKernel::new(), None, &[], &QcConfig::default());
    let flags = summary.flags();
    assert!(!flags["minimum_thickness"]);
    assert!(!flags["printable_orientation"]);
    assert!(flags["sleeve_collision"]);
    assert!(flags["undercut"]);
    assert!(!summary.passes);
}

#[test]
fn summary_is_idempotent() {
    let kernel = NativeKernel::new();
    let mesh = cylinder([0.0; 3], 12.0, 6.0, 32);
    let implants = spaced_implants();
    let config = QcConfig::default();
    let first = qc_summary(&kernel, Some(&mesh), &implants, &config);
    let second = qc_summary(&kernel, Some(&mesh), &implants, &config);
    assert_eq!(first, second);
}

#[test]
fn summary_serializes_as_plain_data() {
    let summary = qc_summary(
        &NullKernel::new(),
        Some(&guide()),
        &spaced_implants(),
        &QcConfig::default(),
    );
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["minimum_thickness"]["minimum_thickness_mm"], 5.0);
    assert_eq!(json["printable_orientation"]["score"], 1.0);
    assert_eq!(json["undercut"]["undercut_risk"], 0.0);
    assert_eq!(json["passes"], true);
}

#[test]
fn checks_expose_metric_values() {
    let kernel: Box<dyn MeshKernel> = Box::new(NativeKernel::new());
    let summary = qc_summary(kernel.as_ref(), Some(&guide()), &[], &QcConfig::default());
    let metrics: Vec<(&str, f64)> = summary
        .checks()
        .iter()
        .map(|c| (c.name(), c.metric_value()))
        .collect();
    assert_eq!(
        metrics,
        vec![
            ("minimum_thickness", 5.0),
            ("sleeve_collision", 0.0),
            ("undercut", 0.5),
            ("printable_orientation", 1.0),
        ]
    );
}

fn arb_implant() -> impl Strategy<Value = Implant> {
    (
        prop::array::uniform3(-20.0f64..20.0),
        0.5f64..5.0,
    )
        .prop_map(|(p, r)| Implant::with_radius(p, r))
}

proptest! {
    #[test]
    fn collision_is_symmetric(a in arb_implant(), b in arb_implant()) {
        let ab = sleeve_collision_check(&[a, b]);
        let ba = sleeve_collision_check(&[b, a]);
        prop_assert_eq!(ab.passes, ba.passes);
        prop_assert_eq!(ab.collisions.len(), ba.collisions.len());
        if let (Some(x), Some(y)) = (ab.collisions.first(), ba.collisions.first()) {
            prop_assert_eq!(x.distance, y.distance);
        }
    }

    #[test]
    fn collisions_respect_pair_order(implants in prop::collection::vec(arb_implant(), 0..8)) {
        let r = sleeve_collision_check(&implants);
        prop_assert_eq!(r.passes, r.collisions.is_empty());
        for c in &r.collisions {
            prop_assert!(c.implant_a < c.implant_b);
            prop_assert!(c.implant_b < implants.len());
        }
    }
}
