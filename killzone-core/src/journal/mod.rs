//! Trade-journal analytics: feature extraction and similarity ranking.

pub mod features;
pub mod knn;

pub use features::{
    extract_features, summarize, vector, FeatureExtraction, JournalSummary, TradeFeatures,
    FEATURE_DIMS,
};
pub use knn::{nearest_neighbors, Neighbor, DEFAULT_WEIGHTS};
