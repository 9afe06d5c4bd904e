/// VTT Fog-of-War Vision Core
///
/// Visibility polygons, light resolution and persistent fog memory
/// for tabletop battle maps.

pub mod config;
pub mod fog;
pub mod util;
pub mod vision;

// Re-export commonly used types
pub use crate::config::SceneEnvironment;
pub use crate::fog::*;
pub use crate::vision::*;
