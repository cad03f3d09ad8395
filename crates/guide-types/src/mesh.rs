use serde::{Deserialize, Serialize};

/// Polygonal surface mesh in 3D space.
///
/// Polygons index into `points`. Nothing here guarantees the indices are in
/// range or that the polygons are triangles: meshes arrive from scanners and
/// segmentation tools and may be malformed. Kernel operations validate what
/// they need and report `InvalidMesh` instead of panicking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions in millimeters.
    pub points: Vec<[f64; 3]>,
    /// Polygons as lists of point indices.
    pub polys: Vec<Vec<u32>>,
    /// Per-point normals, present after normal recomputation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<[f64; 3]>>,
}

impl Mesh {
    pub fn new(points: Vec<[f64; 3]>, polys: Vec<Vec<u32>>) -> Self {
        Self {
            points,
            polys,
            normals: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a mesh from triangle index triplets.
    pub fn from_triangles(points: Vec<[f64; 3]>, triangles: &[[u32; 3]]) -> Self {
        Self::new(points, triangles.iter().map(|t| t.to_vec()).collect())
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn poly_count(&self) -> usize {
        self.polys.len()
    }

    /// A mesh with no points carries no geometry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if every polygon index refers to an existing point.
    pub fn indices_in_range(&self) -> bool {
        let n = self.points.len();
        self.polys
            .iter()
            .all(|poly| poly.iter().all(|&i| (i as usize) < n))
    }

    /// True if every polygon has exactly three vertices.
    pub fn is_triangulated(&self) -> bool {
        self.polys.iter().all(|poly| poly.len() == 3)
    }

    /// Iterate over triangles, skipping polygons that are not triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.polys
            .iter()
            .filter(|poly| poly.len() == 3)
            .map(|poly| [poly[0], poly[1], poly[2]])
    }

    /// Axis-aligned bounds over finite points, `None` if there are none.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut finite = self
            .points
            .iter()
            .filter(|p| p.iter().all(|c| c.is_finite()));
        let first = finite.next()?;
        let mut bounds = Bounds {
            min: *first,
            max: *first,
        };
        for p in finite {
            bounds.include(p);
        }
        Some(bounds)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds {
    pub fn include(&mut self, p: &[f64; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    /// Extents along x, y, z.
    pub fn dimensions(&self) -> [f64; 3] {
        [
            (self.max[0] - self.min[0]).abs(),
            (self.max[1] - self.min[1]).abs(),
            (self.max[2] - self.min[2]).abs(),
        ]
    }

    pub fn diagonal(&self) -> f64 {
        let [dx, dy, dz] = self.dimensions();
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
