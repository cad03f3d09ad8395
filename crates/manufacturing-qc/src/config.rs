/// Limits used by the QC checks. Lengths in millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct QcConfig {
    /// Smallest bounding-box extent a guide may have.
    pub min_thickness_mm: f64,
    /// A point whose normal has a component along `build_axis` below this
    /// value faces away from the build direction.
    pub undercut_normal_threshold: f64,
    /// Undercut risk must stay strictly below this.
    pub max_undercut_risk: f64,
    /// Build and insertion direction.
    pub build_axis: [f64; 3],
    /// Footprint area at which the footprint score saturates.
    pub full_footprint_mm2: f64,
    /// Height over width ratio where the slenderness penalty starts.
    pub slenderness_onset: f64,
    /// Ratio span over which the slenderness penalty grows to its maximum.
    pub slenderness_band: f64,
    pub min_orientation_score: f64,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            min_thickness_mm: 1.5,
            undercut_normal_threshold: -0.2,
            max_undercut_risk: 0.35,
            build_axis: [0.0, 0.0, 1.0],
            full_footprint_mm2: 600.0,
            slenderness_onset: 1.2,
            slenderness_band: 1.8,
            min_orientation_score: 0.6,
        }
    }
}
