//! Bridge to truck's `PolygonMesh` and the truck-meshalgo filters.
//!
//! Faces are handed over in order and come back in order as long as every
//! face is a triangle, which is what the kernel feeds in after `triangles_of`.

use std::collections::HashSet;
use std::f64::consts::PI;

use guide_types::Mesh;
use truck_meshalgo::prelude::*;

use super::{arr, v3, Vec3};

pub(crate) fn to_polygon_mesh(points: &[[f64; 3]], faces: &[Vec<u32>]) -> PolygonMesh {
    let positions = points
        .iter()
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();
    let faces = faces
        .iter()
        .filter(|f| f.len() >= 3)
        .map(|f| {
            f.iter()
                .map(|&i| StandardVertex {
                    pos: i as usize,
                    uv: None,
                    nor: None,
                })
                .collect::<Vec<_>>()
        })
        .collect::<Faces>();
    PolygonMesh::new(
        StandardAttributes {
            positions,
            uv_coords: Vec::new(),
            normals: Vec::new(),
        },
        faces,
    )
}

pub(crate) fn from_polygon_mesh(polymesh: &PolygonMesh) -> Mesh {
    let points = polymesh
        .positions()
        .iter()
        .map(|p| [p.x, p.y, p.z])
        .collect();
    let polys = polymesh
        .faces()
        .face_iter()
        .map(|face| face.iter().map(|v| v.pos as u32).collect())
        .collect();
    Mesh::new(points, polys)
}

pub(crate) fn triangulate(points: &[[f64; 3]], faces: &[Vec<u32>]) -> Mesh {
    let mut polymesh = to_polygon_mesh(points, faces);
    polymesh.triangulate();
    from_polygon_mesh(&polymesh)
}

/// Merge points closer than `tolerance`, then drop faces that collapsed,
/// repeated faces and unreferenced points.
pub(crate) fn weld(points: &[[f64; 3]], faces: &[Vec<u32>], tolerance: f64) -> Mesh {
    let mut polymesh = to_polygon_mesh(points, faces);
    polymesh
        .put_together_same_attrs(tolerance)
        .remove_degenerate_faces()
        .remove_unused_attrs();
    let mut mesh = from_polygon_mesh(&polymesh);

    let mut seen = HashSet::new();
    mesh.polys.retain(|poly| {
        let mut key = poly.clone();
        key.sort_unstable();
        key.dedup();
        key.len() >= 3 && seen.insert(key)
    });
    mesh
}

/// Face-index groups connected through shared edges. Triangles that repeat
/// a point belong to no group.
pub(crate) fn components(points: &[[f64; 3]], triangles: &[[u32; 3]]) -> Vec<Vec<usize>> {
    let kept: Vec<usize> = (0..triangles.len())
        .filter(|&i| is_proper(&triangles[i]))
        .collect();
    let faces: Vec<Vec<u32>> = kept.iter().map(|&i| triangles[i].to_vec()).collect();
    to_polygon_mesh(points, &faces)
        .components(false)
        .into_iter()
        .map(|group| group.into_iter().map(|f| kept[f]).collect())
        .collect()
}

/// Closed boundary loops as point indices. The closing point is not repeated.
pub(crate) fn boundary_loops(points: &[[f64; 3]], triangles: &[[u32; 3]]) -> Vec<Vec<u32>> {
    to_polygon_mesh(points, &as_faces(triangles))
        .extract_boundaries()
        .into_iter()
        .map(|boundary| {
            let mut ring: Vec<u32> = boundary.into_iter().map(|i| i as u32).collect();
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            ring
        })
        .filter(|ring| ring.len() >= 3)
        .collect()
}

/// One unit normal per point from truck's smooth normals. Points with no
/// usable incident face get a zero vector.
pub(crate) fn point_normals(points: &[[f64; 3]], triangles: &[[u32; 3]]) -> Vec<[f64; 3]> {
    let mut polymesh = to_polygon_mesh(points, &as_faces(triangles));
    polymesh.add_smooth_normals(PI, true);

    let normals = polymesh.normals();
    let mut sums = vec![Vec3::zeros(); points.len()];
    for face in polymesh.faces().face_iter() {
        for v in face {
            let Some(n) = v.nor.and_then(|i| normals.get(i)) else {
                continue;
            };
            let n = v3(&[n.x, n.y, n.z]);
            if n.iter().all(|c| c.is_finite()) {
                sums[v.pos] += n;
            }
        }
    }
    sums.iter()
        .map(|s| {
            let len = s.norm();
            if len > 1e-12 {
                arr(&(*s / len))
            } else {
                [0.0; 3]
            }
        })
        .collect()
}

fn is_proper(t: &[u32; 3]) -> bool {
    t[0] != t[1] && t[1] != t[2] && t[2] != t[0]
}

fn as_faces(triangles: &[[u32; 3]]) -> Vec<Vec<u32>> {
    triangles
        .iter()
        .filter(|t| is_proper(t))
        .map(|t| t.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use guide_types::primitives::cuboid;

    #[test]
    fn polygon_mesh_keeps_faces_in_order() {
        let mesh = cuboid([0.0; 3], [1.0; 3]);
        let back = from_polygon_mesh(&to_polygon_mesh(&mesh.points, &mesh.polys));
        assert_eq!(back, mesh);
    }

    #[test]
    fn weld_merges_coincident_points() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let mesh = weld(&points, &[vec![0, 1, 2], vec![3, 4, 5]], 1e-6);
        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.poly_count(), 2);
    }

    #[test]
    fn weld_drops_collapsed_and_repeated_faces() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let faces = [vec![0, 1, 2], vec![0, 0, 1], vec![1, 2, 0]];
        let mesh = weld(&points, &faces, 1e-6);
        assert_eq!(mesh.poly_count(), 1);
    }

    #[test]
    fn open_box_has_one_square_boundary() {
        let mut mesh = cuboid([0.0; 3], [1.0; 3]);
        mesh.polys.truncate(10);
        let triangles: Vec<[u32; 3]> = mesh.polys.iter().map(|p| [p[0], p[1], p[2]]).collect();
        let loops = boundary_loops(&mesh.points, &triangles);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4);
    }

    #[test]
    fn separate_triangles_are_separate_components() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [5.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
            [5.0, 1.0, 0.0],
        ];
        let groups = components(&points, &[[0, 1, 2], [3, 4, 5]]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn flat_square_normals_are_unit() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        for n in point_normals(&points, &[[0, 1, 2], [0, 2, 3]]) {
            assert_relative_eq!(n[2], 1.0, epsilon = 1e-12);
        }
    }
}
