//! # Holofield
//!
//! A holographic particle backdrop with a small portfolio content API.
//!
//! The visual side is a CPU-stepped particle simulation rendered with
//! wgpu: a Fibonacci-sphere point cloud that springs back while the
//! cursor pushes it away, an extruded set of initials bobbing beside it,
//! and a slowly rotating starfield behind both. The API side is a tiny
//! HTTP server with two JSON endpoints that proxy upstream services and
//! degrade to canned content.
//!
//! ## Quick Start
//!
//! ```ignore
//! use holofield::config::BackdropConfig;
//!
//! fn main() -> Result<(), holofield::error::BackdropError> {
//!     holofield::app::run(BackdropConfig::default())
//! }
//! ```
//!
//! ## Structure
//!
//! - [`field`] - particle field storage and point-cloud generators
//! - [`forces`] - cursor repulsion, spring return, damping
//! - [`glow`] - transient per-particle glow highlights
//! - [`cursor`] - window-space cursor tracking in NDC
//! - [`scene`] - the composed sphere scene and starfield
//! - [`render`] - wgpu surface, pipelines, per-frame upload
//! - [`app`] - winit event loop and frame pacing
//! - [`api`] - the content API server

pub mod api;
pub mod app;
pub mod config;
pub mod cursor;
pub mod error;
pub mod field;
pub mod forces;
pub mod glow;
pub mod render;
pub mod scene;
pub mod time;

pub use glam::{Vec2, Vec3};

pub use app::run;
pub use config::BackdropConfig;
pub use error::{ApiError, BackdropError, GpuError};
