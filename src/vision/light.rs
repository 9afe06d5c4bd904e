/// 光照解析
///
/// 由場景光源與阻光牆計算任一點的光照等級
use vek::Vec2;

use super::blocker::VisionBlocker;
use super::polygon::{LightLevel, LightSource};
use super::raycaster::Raycaster;
use crate::config::SceneEnvironment;

pub struct LightResolver;

impl LightResolver {
    /// 計算某點的光照等級
    ///
    /// 全域照明直接回傳亮光。否則逐一檢查發光光源：
    /// 亮光半徑內立即回傳亮光（單一亮光即足夠），微光半徑內記為微光候選，
    /// 被阻光牆擋住的光源不貢獻任何光照。
    pub fn light_level_at(
        point: Vec2<f32>,
        sources: &[LightSource],
        walls: &[VisionBlocker],
        env: &SceneEnvironment,
    ) -> LightLevel {
        if env.global_light {
            return LightLevel::Bright;
        }

        let blocking: Vec<VisionBlocker> = walls
            .iter()
            .filter(|w| w.blocks_light)
            .cloned()
            .collect();

        let mut level = env.ambient_light;
        for source in sources {
            if !source.emits_light {
                continue;
            }
            let total_radius = source.bright_radius + source.dim_radius;
            if total_radius <= 0.0 {
                continue;
            }

            let distance_ft = env.px_to_feet(point.distance(source.position));
            if distance_ft > total_radius {
                continue;
            }
            if Raycaster::segment_blocked(source.position, point, &blocking) {
                continue;
            }

            if distance_ft <= source.bright_radius {
                return LightLevel::Bright;
            }
            level = level.max(LightLevel::Dim);
        }

        level
    }
}
