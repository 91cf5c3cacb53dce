#![doc = include_str!("../README.md")]

pub mod config;
pub mod cve;
pub mod document;
pub mod error;
pub mod export;
pub mod git;
pub mod lint;
pub mod path;
pub mod repo;
pub mod scanner;
pub mod transform;

// 주요 타입 re-export
pub use config::{LinterConfig, LinterConfigBuilder};
pub use document::cve::CveDocument;
pub use document::researcher::ResearcherDocument;
pub use document::{Document, DocumentKind, LintWarning};
pub use error::LinterError;
pub use export::{ExportRecord, ExportReport, Exporter};
pub use git::{GitBackend, GitOptions, VersionControl};
pub use lint::{FileFailure, LintReport, Linter};
pub use path::PathClassifier;
pub use repo::Repository;
pub use scanner::{ScanCompletion, ScanOptions, ScanOrder, TreeScan};
pub use transform::{LintOutcome, Transformer};
