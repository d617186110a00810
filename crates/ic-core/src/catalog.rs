//! Course catalog data source
//!
//! The catalog is a fixed, ordered collection of plain-text chunks loaded
//! once at startup and never modified afterwards.

use crate::config::{ConfigError, RagConfig};
use crate::{IcError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Built-in Northwood University course catalog
const COURSE_CATALOG_CHUNKS: &[&str] = &[
    "CS 101: Introduction to Programming. 4 credits. Covers variables, control flow, \
     functions, and basic data structures using Python. No prior experience required. \
     Offered every Fall and Spring.",
    "CS 201: Data Structures and Algorithms. 4 credits. Prerequisite: CS 101. Lists, \
     trees, hash tables, graphs, sorting, and asymptotic analysis.",
    "CS 230: Computer Systems. 3 credits. Prerequisite: CS 201. Machine-level \
     representation of programs, memory hierarchy, processes, and concurrency.",
    "CS 310: Database Systems. 3 credits. Prerequisite: CS 201. Relational model, SQL, \
     normalization, indexing, and transaction processing.",
    "CS 340: Operating Systems. 3 credits. Prerequisites: CS 230 and MATH 210. \
     Scheduling, virtual memory, file systems, and synchronization.",
    "CS 405: Machine Learning. 3 credits. Prerequisites: CS 201, MATH 210, and STAT 250. \
     Supervised and unsupervised learning, model evaluation, and neural networks.",
    "CS 450: Artificial Intelligence. 3 credits. Prerequisite: CS 201. Search, \
     knowledge representation, planning, and natural language processing.",
    "MATH 100: College Algebra. 3 credits. Linear and quadratic equations, functions, \
     polynomials, and exponential and logarithmic models.",
    "MATH 150: Calculus I. 4 credits. Prerequisite: MATH 100 or placement. Limits, \
     derivatives, and an introduction to integrals.",
    "MATH 210: Linear Algebra. 3 credits. Prerequisite: MATH 150. Vector spaces, \
     matrices, determinants, eigenvalues, and linear transformations.",
    "STAT 250: Probability and Statistics. 3 credits. Prerequisite: MATH 150. \
     Probability distributions, estimation, hypothesis testing, and regression.",
    "PHYS 120: General Physics I. 4 credits with lab. Corequisite: MATH 150. \
     Mechanics, energy, momentum, and waves.",
    "ENG 110: Academic Writing. 3 credits. Required for all first-year students. \
     Argumentation, research methods, and citation practices.",
    "BIO 101: Principles of Biology. 4 credits with lab. Cell structure, genetics, \
     evolution, and ecology. Satisfies the natural science requirement.",
    "ECON 101: Principles of Microeconomics. 3 credits. Supply and demand, market \
     structures, consumer choice, and public policy.",
    "The Computer Science major requires CS 101, CS 201, CS 230, CS 340, MATH 150, \
     MATH 210, STAT 250, and four upper-division CS electives. Students must earn a \
     C or better in all major courses.",
];

/// A single immutable unit of catalog text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogChunk(String);

impl CatalogChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CatalogChunk {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for CatalogChunk {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Read-only, ordered collection of catalog chunks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    chunks: Vec<CatalogChunk>,
}

impl Catalog {
    /// Create a catalog from explicit chunks
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CatalogChunk>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }

    /// The hardcoded Northwood University catalog
    pub fn builtin() -> Self {
        Self::new(COURSE_CATALOG_CHUNKS.iter().copied())
    }

    /// Load a catalog from a TOML file of the form `chunks = ["...", ...]`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let catalog: Catalog = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if catalog.is_empty() {
            return Err(IcError::Catalog(format!(
                "catalog file {} contains no chunks",
                path.display()
            )));
        }

        Ok(catalog)
    }

    /// Load the configured catalog, falling back to the built-in one
    pub fn load(config: &RagConfig) -> Result<Self> {
        match config.catalog_path.as_ref() {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogChunk> {
        self.chunks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog.iter().any(|c| c.as_str().starts_with("CS 101")));
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = Catalog::new(["b", "a", "b"]);
        let texts: Vec<_> = catalog.iter().map(CatalogChunk::as_str).collect();
        assert_eq!(texts, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_load_defaults_to_builtin() {
        let catalog = Catalog::load(&RagConfig::default()).unwrap();
        assert_eq!(catalog.len(), Catalog::builtin().len());
    }

    #[test]
    fn test_from_file() {
        let file = temp_file(r#"chunks = ["HIST 200: World History.", "ART 110: Drawing I."]"#);

        let catalog = Catalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().next().unwrap().as_str(), "HIST 200: World History.");
    }

    #[test]
    fn test_from_file_empty_is_error() {
        let file = temp_file("chunks = []");

        let err = Catalog::from_file(file.path()).unwrap_err();
        assert!(matches!(err, IcError::Catalog(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Catalog::from_file("/nonexistent/catalog.toml").unwrap_err();
        assert!(matches!(err, IcError::Config(ConfigError::FileReadError { .. })));
    }
}
