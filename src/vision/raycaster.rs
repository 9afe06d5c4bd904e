/// 射線投射器
///
/// 對牆集合投射單一射線並回傳最近的命中結果
use log::warn;
use vek::Vec2;

use super::blocker::VisionBlocker;
use super::geometry::GeometryUtils;

/// 方向向量長度下限，低於此值視為呼叫端錯誤
const MIN_DIRECTION_LEN: f32 = 1e-6;

/// 射線命中結果
#[derive(Debug, Clone)]
pub struct RayHit {
    /// 命中點
    pub point: Vec2<f32>,
    /// 距離原點的距離
    pub distance: f32,
    /// 命中的牆識別碼
    pub wall_id: String,
    /// 命中的線段索引
    pub segment_index: usize,
    /// 表面外法線，朝向射線來向（僅反射特效使用）
    pub normal: Vec2<f32>,
}

pub struct Raycaster;

impl Raycaster {
    /// 投射射線，回傳 [0, max_distance] 內全域最近的命中結果
    ///
    /// 方向向量在內部正規化；零長度方向是呼叫端錯誤，記錄後回傳 None。
    pub fn cast(
        origin: Vec2<f32>,
        direction: Vec2<f32>,
        walls: &[VisionBlocker],
        max_distance: f32,
    ) -> Option<RayHit> {
        if direction.magnitude() < MIN_DIRECTION_LEN {
            warn!("射線方向長度為零，忽略此次投射");
            return None;
        }
        if max_distance <= 0.0 {
            return None;
        }

        let dir = direction.normalized();
        let mut nearest: Option<RayHit> = None;

        for wall in walls {
            for (index, (a, b)) in wall.segments().into_iter().enumerate() {
                if let Some((t, _u)) = GeometryUtils::ray_segment_intersection(origin, dir, a, b) {
                    if t > max_distance {
                        continue;
                    }
                    let closer = match nearest {
                        Some(ref hit) => t < hit.distance,
                        None => true,
                    };
                    if closer {
                        nearest = Some(RayHit {
                            point: origin + dir * t,
                            distance: t,
                            wall_id: wall.id.clone(),
                            segment_index: index,
                            normal: Self::surface_normal(a, b, dir),
                        });
                    }
                }
            }
        }

        nearest
    }

    /// 檢查兩點之間的連線是否被牆阻擋
    pub fn segment_blocked(from: Vec2<f32>, to: Vec2<f32>, walls: &[VisionBlocker]) -> bool {
        let delta = to - from;
        let distance = delta.magnitude();
        if distance < MIN_DIRECTION_LEN {
            return false;
        }
        Self::cast(from, delta, walls, distance).is_some()
    }

    /// 線段外法線，方向與入射射線相對
    fn surface_normal(a: Vec2<f32>, b: Vec2<f32>, ray_dir: Vec2<f32>) -> Vec2<f32> {
        let seg = (b - a).normalized();
        let mut normal = Vec2::new(-seg.y, seg.x);
        if normal.dot(ray_dir) > 0.0 {
            normal = -normal;
        }
        normal
    }
}
