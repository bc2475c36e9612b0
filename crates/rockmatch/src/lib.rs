//! Rock matching across two surveys of the same terrain.
//!
//! Each rock outline is reduced to a fixed-order vector of shape descriptors
//! (`descriptors`), and cross-survey pairs are ranked with the TS-SS
//! composite similarity (`tsss`). `matching` ties the two together and checks
//! results against synthetic surveys from `geom2::rand`.
//!
//! Everything here is pure and synchronous: inputs are borrowed, outputs are
//! fresh values, nothing is cached.

pub mod descriptors;
pub mod error;
pub mod geom2;
pub mod matching;
pub mod tsss;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use descriptors::{ShapeFeatures, FEATURE_NAMES};
pub use error::{MatchError, Result};
pub use geom2::{Polygon2, Segment2, Shape2};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for callers.
pub mod prelude {
    pub use crate::descriptors::{
        compactness, convexity, eccentricity, orientation, solidity, ShapeFeatures,
        FEATURE_NAMES,
    };
    pub use crate::error::{MatchError, Result};
    pub use crate::geom2::rand::{
        draw_rock, draw_survey_pair, resurvey, ReplayToken, ResurveyCfg, RockCfg, VertexCount,
    };
    pub use crate::geom2::{Polygon2, Segment2, Shape2};
    pub use crate::matching::{
        check_matches, extract_frame, match_polygons, match_segments, nearest_matches, Match,
        MatchCfg, MatchReport, Metric,
    };
    pub use crate::tsss::{ts_ss, ts_ss_with, AngleConvention};
    pub use nalgebra::Vector2 as Vec2;
}
