//! # autoshade
//!
//! Automatic conversion of imported scene materials to a canonical
//! standard-surface shading network.
//!
//! After a scene import, every material binding carries whatever shader
//! the interchange format produced. This crate rebuilds each one as the
//! canonical physically-based surface: existing upstream textures are
//! reused where possible, missing channels are resolved from a texture
//! directory by filename convention, and anything still unconnected gets
//! a neutral default. UV assignments survive the rewiring, and legacy
//! shaders are deleted once nothing references them.
//!
//! The scene itself is reached through the [`scene::SceneGraph`]
//! capability trait; hosts implement it over their native scene service,
//! and [`scene::memory::MemoryScene`] provides a standalone in-memory
//! graph.
//!
//! ## Modules
//!
//! - [`util`] - Error types
//! - [`scene`] - Scene-graph data model, capability trait, in-memory graph
//! - [`convert`] - The conversion engine
//!
//! ## Example
//!
//! ```ignore
//! use autoshade::convert::{convert_scene, ConvertOptions};
//!
//! let report = convert_scene(&mut scene, &ConvertOptions::default(), "/textures");
//! println!("{report}");
//! ```

pub mod convert;
pub mod scene;
pub mod util;

// Re-export commonly used types
pub use convert::{
    convert_material, convert_scene, Channel, ConvertOptions, ConvertReport, ExtractionMode,
    TextureResolver,
};
pub use scene::{AttrValue, NodeId, NodeKind, Plug, SceneGraph};
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::convert::{
        convert_material, convert_scene, Channel, ConvertOptions, ConvertReport, ExtractionMode,
        TextureResolver,
    };
    pub use crate::scene::memory::MemoryScene;
    pub use crate::scene::{AttrValue, NodeId, NodeKind, Plug, SceneGraph};
    pub use crate::util::{Error, Result};
}
