//! Scene host: owns nodes, attaches components, and drives per-frame updates.
//!
//! # Invariants
//! - Components are updated in node-id order every frame.
//! - Renderers only read; all mutation flows through `Scene::update` or
//!   explicit component access.

pub mod component;
pub mod scene;

pub use component::{Component, Drawable, StaticModel};
pub use scene::{Node, Scene};
