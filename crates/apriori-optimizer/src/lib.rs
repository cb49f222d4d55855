//! Segment-dominance portfolio optimizer.
//!
//! Splits the simulated audience into behavioral clusters, finds the ad that
//! dominates each cluster, and allocates budget in proportion to the value of
//! the clusters each ad owns. Also provides the reaction validator that
//! screens simulated reactions before optimization, the zone-by-tier
//! heatmap used in reports, and drop-off analysis for simulated flows.

pub mod clusters;
pub mod descriptor;
pub mod flows;
pub mod heatmap;
pub mod overlap;
pub mod ownership;
pub mod performance;
pub mod portfolio;
pub mod segments;
pub mod types;
pub mod validator;

mod math;

pub use clusters::{
    categorize_occupation, cluster_id_for, fragment_audience_into_clusters, AgeCategory,
    OccupationCategory,
};
pub use descriptor::identify_specific_segment;
pub use flows::{
    analyze_flow_drop_offs, compare_flows, normalize_drop_off_reason, DropOffAnalysis,
    FlowComparisonResult, FlowRanking, ReasonCount,
};
pub use heatmap::{generate_heatmap_matrix, Heatmap, HeatmapCell};
pub use overlap::compute_audience_overlap;
pub use ownership::assign_segment_owners;
pub use performance::{compute_ad_performance, detect_clickbait_traps};
pub use portfolio::{assign_role, optimize_portfolio, optimize_portfolio_with_policy};
pub use segments::identify_audience_segments;
pub use types::{
    AdPerformance, ClusterInfo, Concentration, PortfolioPolicy, PortfolioRecommendation,
    PortfolioResult, SegmentDescriptor, SegmentOwnership,
};
pub use validator::{
    FlaggedReaction, ReactionValidator, ValidationFlag, ValidationResult, ValidationStatus,
    ValidationSummary,
};
