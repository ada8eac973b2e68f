pub mod models;

pub use models::{
    ClassificationCandidate, ClassificationMethod, ClassificationResult, Complexity, FileStats,
    Language, NodeIdentity, NodeKind, NodeMetadata, NormalizedNode, Point, ProcessedFile, Range,
    RawNode, SemanticCategory, SignificanceLevel,
};

/// Schema version carried by every normalized node and every persisted
/// record derived from one. Consumers must treat unknown versions as
/// forward-incompatible.
pub const SCHEMA_VERSION: u32 = 1;
