//! Game Module
//!
//! A small ECS-inspired layer the platformer is written against.
//!
//! Key concepts:
//! - Entity: Generational index for safe entity references
//! - Component: Plain data structs attached to entities, built from `Comp` recipes
//! - World: Container for all entities and their components
//! - Event: Contacts reported by physics, drained by gameplay handlers
//!
//! Design philosophy:
//! - Simple over flexible (we know what game we're making)
//! - No runtime type registration (compile-time known components)
//! - Gameplay runs on plain data so it can be tested without a window

pub mod entity;
pub mod component;
pub mod components;
pub mod world;
pub mod event;
pub mod collision;
pub mod behaviors;
pub mod hud;
pub mod player;
pub mod runtime;
pub mod renderer;

// Re-export main types
pub use entity::Entity;
pub use world::World;
pub use runtime::{LevelSession, SessionEvent};
