/// 隊伍共享視野合併
///
/// 以凸包近似多個成員視野的聯集；凸包會多揭露成員之間的凹陷區域，
/// 共享視野僅為輔助顯示，此近似可接受
use rayon::prelude::*;
use vek::Vec2;

use super::blocker::VisionBlocker;
use super::builder::VisibilityPolygonBuilder;
use super::geometry::GeometryUtils;
use super::polygon::{LightSource, VisionPolygon};
use super::profile::{TokenVision, VisionMode};
use crate::config::SceneEnvironment;

pub struct PartyVisionMerger;

impl PartyVisionMerger {
    /// 合併多個視野多邊形
    ///
    /// 單一輸入原樣回傳；多個輸入時回傳所有頂點的凸包
    pub fn merge(polygons: Vec<VisionPolygon>) -> VisionPolygon {
        let mut polygons = polygons;
        match polygons.len() {
            0 => return VisionPolygon::empty(VisionMode::Basic),
            1 => return polygons.remove(0),
            _ => {}
        }

        let range = polygons.iter().map(|p| p.range).fold(0.0, f32::max);
        let all_points: Vec<Vec2<f32>> = polygons
            .iter()
            .flat_map(|p| p.points.iter().copied())
            .collect();

        VisionPolygon {
            points: GeometryUtils::convex_hull(all_points),
            range,
            mode: VisionMode::Basic,
            cone_angle: None,
            rotation: None,
        }
    }

    /// 平行建構所有隊伍成員的視野並合併
    ///
    /// 每個成員的計算只讀取共享的牆與光源資料，彼此獨立可平行
    pub fn build_party_vision(
        tokens: &[TokenVision],
        walls: &[VisionBlocker],
        lights: &[LightSource],
        env: &SceneEnvironment,
    ) -> VisionPolygon {
        let builder = VisibilityPolygonBuilder::new();
        let polygons: Vec<VisionPolygon> = tokens
            .par_iter()
            .map(|token| builder.build_for_token(token, walls, lights, env))
            .filter(|polygon| !polygon.is_empty())
            .collect();

        Self::merge(polygons)
    }
}
