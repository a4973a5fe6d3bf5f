mod engine;
mod similarity;

pub use engine::{
    SearchEngine, DEFAULT_ADVANCED_LIMIT, DEFAULT_SEARCH_LIMIT, MIN_QUERY_LEN,
    RELEVANCE_THRESHOLD, SIBLING_SIMILARITY_THRESHOLD,
};
pub use similarity::{similarity, CONTAINMENT_SCORE};
