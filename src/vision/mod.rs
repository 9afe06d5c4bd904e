/// 視野系統模組
///
/// 射線投射、視野多邊形建構、視覺模式與光照解析
pub mod blocker;
pub mod builder;
pub mod geometry;
pub mod light;
pub mod mathematical_tests;
pub mod party;
pub mod polygon;
pub mod profile;
pub mod quadtree;
pub mod raycaster;
pub mod resolver;

pub use self::{
    blocker::VisionBlocker,
    builder::{FacingCone, VisibilityPolygonBuilder},
    geometry::{Bounds, GeometryUtils},
    light::LightResolver,
    party::PartyVisionMerger,
    polygon::{LightLevel, LightSource, VisionEndpoint, VisionPolygon},
    profile::{TokenVision, VisionMode, VisionProfile},
    quadtree::WallIndex,
    raycaster::{RayHit, Raycaster},
    resolver::VisionResolver,
};
