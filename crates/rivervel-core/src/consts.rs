/// Number of evenly spaced samples taken along a cross-section.
pub const DEFAULT_PROFILE_RESOLUTION: usize = 200;

/// Accepted header names for the X velocity component, in resolution order.
pub const UX_ALIASES: [&str; 4] = ["Ux_[m.s^{-1}]", "Ux_[m.s^{-1}}]", "Ux_[m.s-1]", "Ux"];

/// Accepted header names for the Y velocity component, in resolution order.
pub const UY_ALIASES: [&str; 4] = ["Uy_[m.s^{-1}]", "Uy_[m.s^{-1}}]", "Uy_[m.s-1]", "Uy"];

/// Header of the X position column.
pub const X_COLUMN: &str = "X";

/// Header of the Y position column.
pub const Y_COLUMN: &str = "Y";

/// Delimiters tried, in order, when sniffing a table header.
pub const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Output file holding the sampled cross-section.
pub const CROSS_SECTION_FILE: &str = "velocity_cross_section.csv";

/// Output file holding per-section averages.
pub const SECTION_AVERAGES_FILE: &str = "section_average_velocities.csv";

/// Output file holding the two selected endpoints.
pub const SELECTED_POINTS_FILE: &str = "selected_points.csv";

/// File name the optical flow collaborator writes into its working directory.
pub const VELOCITY_FIELD_FILE: &str = "velocity_field.csv";

/// Relative tolerance for barycentric containment tests.
pub const BARYCENTRIC_EPSILON: f64 = 1e-10;

/// Triangles with a doubled area below this (relative to the field extent
/// squared) are treated as singular.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

/// Relative tolerance under which three points count as collinear while
/// sweeping the convex hull.
pub const COLLINEAR_EPSILON: f64 = 1e-12;

/// Relative tolerance of the in-circle test driving Delaunay edge flips.
pub const INCIRCLE_EPSILON: f64 = 1e-12;

/// Minimum profile length to run the linear pass with Rayon.
pub const PARALLEL_SAMPLE_THRESHOLD: usize = 64;

/// Default first frame handed to the optical flow collaborator.
pub const DEFAULT_START_FRAME: usize = 150;

/// Default upper velocity display limit (m/s) for optical flow.
pub const DEFAULT_VELOCITY_LIMIT: f64 = 10.0;

/// Default video frame rate assumed when scaling optical flow output.
pub const DEFAULT_FRAMES_PER_SECOND: f64 = 30.0;
