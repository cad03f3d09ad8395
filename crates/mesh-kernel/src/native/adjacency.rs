use std::collections::{HashMap, HashSet};

/// Undirected edge to incident-triangle lookup.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeMap {
    edge_to_faces: HashMap<(u32, u32), Vec<usize>>,
}

impl EdgeMap {
    pub(crate) fn build(triangles: &[[u32; 3]]) -> Self {
        let mut edge_to_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        for (face_idx, t) in triangles.iter().enumerate() {
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                edge_to_faces
                    .entry(normalize_edge(a, b))
                    .or_default()
                    .push(face_idx);
            }
        }
        Self { edge_to_faces }
    }

    pub(crate) fn faces(&self, a: u32, b: u32) -> &[usize] {
        self.edge_to_faces
            .get(&normalize_edge(a, b))
            .map_or(&[], Vec::as_slice)
    }

    pub(crate) fn face_count(&self, a: u32, b: u32) -> usize {
        self.faces(a, b).len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&(u32, u32), &Vec<usize>)> {
        self.edge_to_faces.iter()
    }

    /// True when every edge has one or two faces, shared edges run opposite
    /// ways, and each point starts at most one boundary edge and ends as many
    /// as it starts. Boundary edges then form disjoint simple loops.
    pub(crate) fn has_traceable_boundary(&self, triangles: &[[u32; 3]]) -> bool {
        let mut directed = HashSet::new();
        let mut starts: HashMap<u32, (u32, u32)> = HashMap::new();
        for t in triangles {
            if t[0] == t[1] || t[1] == t[2] || t[2] == t[0] {
                return false;
            }
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                if !directed.insert((a, b)) || self.face_count(a, b) > 2 {
                    return false;
                }
                if self.face_count(a, b) == 1 {
                    starts.entry(a).or_default().0 += 1;
                    starts.entry(b).or_default().1 += 1;
                }
            }
        }
        starts.values().all(|&(out, inc)| out == inc && out <= 1)
    }

    /// Sorted edges whose incident-face count satisfies `pred`.
    pub(crate) fn edges_with(&self, pred: impl Fn(usize) -> bool) -> Vec<(u32, u32)> {
        let mut edges: Vec<(u32, u32)> = self
            .edge_to_faces
            .iter()
            .filter(|(_, faces)| pred(faces.len()))
            .map(|(&edge, _)| edge)
            .collect();
        edges.sort_unstable();
        edges
    }
}

#[inline]
pub(crate) fn normalize_edge(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// True if triangle `t` traverses `a -> b` in its winding order.
#[inline]
pub(crate) fn has_directed_edge(t: &[u32; 3], a: u32, b: u32) -> bool {
    (t[0] == a && t[1] == b) || (t[1] == a && t[2] == b) || (t[2] == a && t[0] == b)
}
