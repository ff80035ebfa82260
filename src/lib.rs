// Export modules for library usage
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod mapping;
pub mod scan;

// Re-export commonly used types
pub use crate::core::{
    CanonicalMethodSet, MethodMapping, MethodName, PostmanLink, UnifiedMapping, VersionMap,
};

pub use crate::core::name::{canonicalize, from_slug, to_folder, to_slug, NAMESPACE_PREFIXES};

pub use crate::core::resolve::{MatchResolver, MatchStats};

pub use crate::analysis::coverage::{CoverageAnalyzer, CoverageBreakdown, CoverageReport, GapStats};

pub use crate::config::DocmapConfig;

pub use crate::errors::{DocmapError, RunDiagnostics, ScanFailure, SourceKind};

pub use crate::io::output::{build_document, create_writer, OutputFormat, OutputWriter, RunReport};

pub use crate::mapping::{merge_alias_versions, MappingBuilder};

pub use crate::scan::{
    is_overview_page, DocsScanner, ExamplesScanner, GroundTruthLoader, PostmanScanner, SpecScanner,
};
