//! Caliper Core Types and Drawing Primitives
//!
//! This crate provides the foundational pieces of the Caliper annotation
//! overlay engine. It includes:
//!
//! - **Geometry**: Canvas/world points and pure math helpers ([`geometry`] module)
//! - **Splines**: Contour interpolation ([`spline`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Draw**: The retained scene node cache and primitive drawers ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod spline;
