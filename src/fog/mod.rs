/// 戰爭迷霧模組
///
/// 已揭露區域的累積、合併與簡化
pub mod accumulator;
pub mod simplify;

pub use self::{
    accumulator::{FogAccumulator, FogPolygon, FogStats, SharedFogAccumulator},
    simplify::PolygonSimplifier,
};
