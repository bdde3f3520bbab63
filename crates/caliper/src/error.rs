//! Error types for Caliper operations.
//!
//! This module provides the main error type [`CaliperError`]. Most problems
//! met during a render pass are local skips and never surface here; the only
//! render-time error is a broken contour ownership link.

use std::io;

use thiserror::Error;

use crate::annotation::ShapeKind;

/// The main error type for Caliper operations.
#[derive(Debug, Error)]
pub enum CaliperError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// An annotation was constructed with the wrong number of control points.
    #[error(
        "annotation `{id}` of kind {kind} requires {expected} control points, got {actual}"
    )]
    HandleCount {
        id: String,
        kind: ShapeKind,
        expected: String,
        actual: usize,
    },

    /// A contour references child contours that are not in the store.
    #[error("contour `{parent}` references missing child contours: {}", children.join(", "))]
    MissingChildContour {
        parent: String,
        children: Vec<String>,
    },

    #[error("unknown annotation `{0}`")]
    UnknownAnnotation(String),

    #[error("Scene error: {0}")]
    Scene(String),
}
