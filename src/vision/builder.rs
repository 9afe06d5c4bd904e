/// 視野多邊形建構器
///
/// 角度掃描法：收集牆頂點方位（±ε 擾動）與均勻後備角度，
/// 逐一投射後依角度排序形成可見區域的多邊形環
use hashbrown::HashSet;
use ordered_float::OrderedFloat;
use std::f32::consts::PI;
use vek::Vec2;

use super::blocker::VisionBlocker;
use super::geometry::GeometryUtils;
use super::light::LightResolver;
use super::polygon::{LightSource, VisionEndpoint, VisionPolygon};
use super::profile::{TokenVision, VisionMode};
use super::raycaster::Raycaster;
use super::resolver::VisionResolver;
use crate::config::SceneEnvironment;

/// 頂點角度擾動量（弧度）
///
/// 沒有擾動時，正好穿過頂點的射線可能回報相鄰兩線段中的任一段
pub const VERTEX_ANGLE_EPS: f32 = 1e-5;
/// 全向掃描的均勻後備射線數
pub const FALLBACK_RAYS_FULL: usize = 64;
/// 扇形掃描的均勻後備射線數
pub const FALLBACK_RAYS_CONE: usize = 32;
/// 鄰近重複點的合併距離（像素）
pub const POINT_DEDUP_TOL: f32 = 0.1;
/// 角度去重的量化步長（弧度）；以整數鍵去重避免浮點相等比較
const ANGLE_DEDUP_STEP: f32 = 1e-6;

/// 面向限制扇形
#[derive(Debug, Clone, Copy)]
pub struct FacingCone {
    /// 面向（弧度）
    pub rotation: f32,
    /// 半開角（弧度）
    pub half_angle: f32,
}

impl FacingCone {
    /// 由角度（度）建立；全向時回傳 None
    pub fn from_degrees(angle_deg: f32, rotation_deg: f32) -> Option<Self> {
        if angle_deg >= 360.0 {
            return None;
        }
        Some(Self {
            rotation: rotation_deg.to_radians(),
            half_angle: (angle_deg * 0.5).to_radians(),
        })
    }

    /// 檢查角度是否落在扇形內
    pub fn contains(&self, angle: f32) -> bool {
        GeometryUtils::angle_difference(self.rotation, angle).abs()
            <= self.half_angle + VERTEX_ANGLE_EPS
    }
}

pub struct VisibilityPolygonBuilder {
    fallback_rays_full: usize,
    fallback_rays_cone: usize,
    dedup_tolerance: f32,
}

impl Default for VisibilityPolygonBuilder {
    fn default() -> Self {
        Self {
            fallback_rays_full: FALLBACK_RAYS_FULL,
            fallback_rays_cone: FALLBACK_RAYS_CONE,
            dedup_tolerance: POINT_DEDUP_TOL,
        }
    }
}

impl VisibilityPolygonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構從原點可見區域的多邊形
    pub fn build(
        &self,
        origin: Vec2<f32>,
        max_range_px: f32,
        walls: &[VisionBlocker],
        cone: Option<FacingCone>,
    ) -> VisionPolygon {
        self.build_with_mode(origin, max_range_px, walls, cone, VisionMode::Basic)
    }

    /// 建構視野多邊形並標記使用的視覺模式
    pub fn build_with_mode(
        &self,
        origin: Vec2<f32>,
        max_range_px: f32,
        walls: &[VisionBlocker],
        cone: Option<FacingCone>,
        mode: VisionMode,
    ) -> VisionPolygon {
        if max_range_px <= 0.0 {
            return VisionPolygon::empty(mode);
        }

        let candidates = self.candidate_angles(origin, walls, cone);
        let mut endpoints: Vec<VisionEndpoint> = candidates
            .into_iter()
            .map(|(angle, is_vertex)| {
                self.cast_endpoint(origin, angle, max_range_px, walls, is_vertex)
            })
            .collect();

        // 依角度排序形成多邊形環；扇形時以與面向的帶號角差為鍵，
        // 起始邊擾動出來的角度才不會繞到 2π 附近排到環尾
        match cone {
            Some(c) => {
                endpoints.sort_by_key(|e| {
                    OrderedFloat(GeometryUtils::angle_difference(c.rotation, e.angle))
                });
            }
            None => {
                endpoints.sort_by_key(|e| OrderedFloat(GeometryUtils::normalize_angle(e.angle)));
            }
        }

        let mut points: Vec<Vec2<f32>> = Vec::with_capacity(endpoints.len() + 3);
        if let Some(c) = cone {
            let start_edge =
                self.cast_endpoint(origin, c.rotation - c.half_angle, max_range_px, walls, false);
            points.push(start_edge.point);
        }
        points.extend(endpoints.iter().map(|e| e.point));
        if let Some(c) = cone {
            let end_edge =
                self.cast_endpoint(origin, c.rotation + c.half_angle, max_range_px, walls, false);
            points.push(end_edge.point);
            // 扇形需回到原點閉合成楔形；全向環不需要原點
            points.push(origin);
        }

        let points = self.dedup_and_close(points);

        VisionPolygon {
            points,
            range: max_range_px,
            mode,
            cone_angle: cone.map(|c| (c.half_angle * 2.0).to_degrees()),
            rotation: cone.map(|c| c.rotation.to_degrees()),
        }
    }

    /// 依單位視覺設定建構視野：解析模式、換算距離、套用牆過濾與面向扇形
    pub fn build_for_token(
        &self,
        token: &TokenVision,
        walls: &[VisionBlocker],
        lights: &[LightSource],
        env: &SceneEnvironment,
    ) -> VisionPolygon {
        let profile = &token.profile;
        if !profile.enabled {
            return VisionPolygon::empty(VisionMode::Basic);
        }

        let ambient = LightResolver::light_level_at(token.position, lights, walls, env);
        let mode = VisionResolver::resolve_mode(profile, ambient);
        let range_ft = VisionResolver::effective_range(profile, mode);
        if range_ft <= 0.0 {
            return VisionPolygon::empty(mode);
        }

        let range_px = env.feet_to_px(range_ft);
        let filtered = VisionResolver::wall_filter(mode, walls);
        let cone = FacingCone::from_degrees(profile.angle, profile.rotation);
        self.build_with_mode(token.position, range_px, &filtered, cone, mode)
    }

    /// 收集候選角度：牆頂點方位 ±ε，加上均勻後備角度
    fn candidate_angles(
        &self,
        origin: Vec2<f32>,
        walls: &[VisionBlocker],
        cone: Option<FacingCone>,
    ) -> Vec<(f32, bool)> {
        let mut seen: HashSet<i64> = HashSet::new();
        let mut angles: Vec<(f32, bool)> = Vec::new();

        fn push_angle(
            angle: f32,
            is_vertex: bool,
            cone: Option<FacingCone>,
            seen: &mut HashSet<i64>,
            out: &mut Vec<(f32, bool)>,
        ) {
            if let Some(c) = cone {
                if !c.contains(angle) {
                    return;
                }
            }
            let key = (GeometryUtils::normalize_angle(angle) / ANGLE_DEDUP_STEP).round() as i64;
            if seen.insert(key) {
                out.push((angle, is_vertex));
            }
        }

        for wall in walls {
            for &vertex in &wall.points {
                let delta = vertex - origin;
                if delta.magnitude_squared() < 1e-12 {
                    continue;
                }
                let base = delta.y.atan2(delta.x);
                push_angle(base - VERTEX_ANGLE_EPS, true, cone, &mut seen, &mut angles);
                push_angle(base, true, cone, &mut seen, &mut angles);
                push_angle(base + VERTEX_ANGLE_EPS, true, cone, &mut seen, &mut angles);
            }
        }

        // 後備角度確保沒有牆或牆稀疏時仍涵蓋整個範圍
        match cone {
            None => {
                let n = self.fallback_rays_full;
                for i in 0..n {
                    let angle = -PI + 2.0 * PI * (i as f32) / (n as f32);
                    push_angle(angle, false, cone, &mut seen, &mut angles);
                }
            }
            Some(c) => {
                let n = self.fallback_rays_cone;
                let span = c.half_angle * 2.0;
                for i in 0..=n {
                    let angle = c.rotation - c.half_angle + span * (i as f32) / (n as f32);
                    push_angle(angle, false, cone, &mut seen, &mut angles);
                }
            }
        }

        angles
    }

    /// 投射單一角度取得端點：命中時取命中點，否則取最大距離端點
    fn cast_endpoint(
        &self,
        origin: Vec2<f32>,
        angle: f32,
        max_range_px: f32,
        walls: &[VisionBlocker],
        is_vertex: bool,
    ) -> VisionEndpoint {
        let direction = Vec2::new(angle.cos(), angle.sin());
        match Raycaster::cast(origin, direction, walls, max_range_px) {
            Some(hit) => VisionEndpoint {
                point: hit.point,
                angle,
                distance: hit.distance,
                is_wall_vertex: is_vertex,
                wall_id: Some(hit.wall_id),
            },
            None => VisionEndpoint {
                point: origin + direction * max_range_px,
                angle,
                distance: max_range_px,
                is_wall_vertex: is_vertex,
                wall_id: None,
            },
        }
    }

    /// 合併鄰近重複點並確保環閉合
    fn dedup_and_close(&self, points: Vec<Vec2<f32>>) -> Vec<Vec2<f32>> {
        let mut out: Vec<Vec2<f32>> = Vec::with_capacity(points.len());
        for p in points {
            let keep = match out.last() {
                Some(last) => last.distance(p) > self.dedup_tolerance,
                None => true,
            };
            if keep {
                out.push(p);
            }
        }

        if out.len() >= 3 {
            let first = out[0];
            let last = out[out.len() - 1];
            if first.distance(last) > self.dedup_tolerance {
                out.push(first);
            }
        }
        out
    }
}
