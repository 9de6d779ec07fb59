//! Render root resolution and render targets.
//!
//! A component writes markup into exactly one [`RenderTarget`], chosen once at
//! construction from its [`RootMode`].

mod core;

pub use self::core::{RenderTarget, RootMode, ShadowMode, TargetKind, resolve_root};
