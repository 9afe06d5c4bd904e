/// 視覺模式與可見性判定
use vek::Vec2;

use super::blocker::VisionBlocker;
use super::geometry::GeometryUtils;
use super::light::LightResolver;
use super::polygon::{LightLevel, LightSource};
use super::profile::{TokenVision, VisionMode, VisionProfile};
use super::raycaster::Raycaster;
use crate::config::SceneEnvironment;

pub struct VisionResolver;

impl VisionResolver {
    /// 依優先度決定生效的視覺模式
    ///
    /// 真實視覺與盲視無視環境光；震動感知恆定生效；
    /// 黑暗視覺只在觀察者所在環境光為微光或黑暗時啟動；
    /// 都不成立時採用明確指定的模式，否則為一般視覺。
    pub fn resolve_mode(profile: &VisionProfile, ambient: LightLevel) -> VisionMode {
        if profile.truesight > 0.0 {
            return VisionMode::Truesight;
        }
        if profile.blindsight > 0.0 {
            return VisionMode::Blindsight;
        }
        if profile.tremorsense > 0.0 {
            return VisionMode::Tremorsense;
        }
        if profile.darkvision > 0.0 && ambient != LightLevel::Bright {
            return VisionMode::Darkvision;
        }
        profile.mode.unwrap_or(VisionMode::Basic)
    }

    /// 生效模式的有效距離（呎）
    pub fn effective_range(profile: &VisionProfile, mode: VisionMode) -> f32 {
        if !profile.enabled {
            return 0.0;
        }
        match mode {
            VisionMode::Basic => profile.range,
            VisionMode::Darkvision => profile.darkvision,
            VisionMode::Blindsight => profile.blindsight,
            VisionMode::Tremorsense => profile.tremorsense,
            VisionMode::Truesight => profile.truesight,
        }
    }

    /// 模式仍會被哪些牆遮擋
    ///
    /// 一般視覺與黑暗視覺尊重所有阻光牆；真實視覺與盲視只被
    /// 同時阻光且阻移動的實體牆遮擋（純阻光的幻象牆視為透明）；
    /// 震動感知完全無視牆。
    pub fn wall_filter(mode: VisionMode, walls: &[VisionBlocker]) -> Vec<VisionBlocker> {
        match mode {
            VisionMode::Basic | VisionMode::Darkvision => walls
                .iter()
                .filter(|w| w.blocks_light)
                .cloned()
                .collect(),
            VisionMode::Truesight | VisionMode::Blindsight => walls
                .iter()
                .filter(|w| w.blocks_light && w.blocks_movement)
                .cloned()
                .collect(),
            VisionMode::Tremorsense => Vec::new(),
        }
    }

    /// 判斷觀察者是否能看見目標（純查詢，無副作用）
    pub fn can_see(
        viewer: &TokenVision,
        target: &TokenVision,
        walls: &[VisionBlocker],
        lights: &[LightSource],
        env: &SceneEnvironment,
    ) -> bool {
        let profile = &viewer.profile;
        if !profile.enabled {
            return false;
        }

        let ambient = LightResolver::light_level_at(viewer.position, lights, walls, env);
        let mode = Self::resolve_mode(profile, ambient);
        let range_ft = Self::effective_range(profile, mode);
        if range_ft <= 0.0 {
            return false;
        }

        let delta = target.position - viewer.position;
        let distance_px = delta.magnitude();
        if env.px_to_feet(distance_px) > range_ft {
            return false;
        }

        // 面向扇形限制
        if profile.has_facing_cone() && distance_px > f32::EPSILON {
            let bearing = delta.y.atan2(delta.x);
            let diff = GeometryUtils::angle_difference(profile.rotation.to_radians(), bearing);
            if diff.abs() > (profile.angle * 0.5).to_radians() {
                return false;
            }
        }

        // 震動感知僅偵測同高度目標
        if mode == VisionMode::Tremorsense
            && (viewer.elevation - target.elevation).abs() > f32::EPSILON
        {
            return false;
        }

        let filtered = Self::wall_filter(mode, walls);
        if Raycaster::segment_blocked(viewer.position, target.position, &filtered) {
            return false;
        }

        // 一般視覺在黑暗中看不見；特殊感官在其距離內無視黑暗
        if !mode.ignores_darkness() {
            let target_light = LightResolver::light_level_at(target.position, lights, walls, env);
            if target_light == LightLevel::Dark {
                return false;
            }
        }

        true
    }

    /// 檢查一個點是否落在觀察者的面向扇形內
    pub fn point_in_facing_cone(viewer: &TokenVision, point: Vec2<f32>) -> bool {
        let profile = &viewer.profile;
        if !profile.has_facing_cone() {
            return true;
        }
        let delta = point - viewer.position;
        if delta.magnitude() <= f32::EPSILON {
            return true;
        }
        let bearing = delta.y.atan2(delta.x);
        let diff = GeometryUtils::angle_difference(profile.rotation.to_radians(), bearing);
        diff.abs() <= (profile.angle * 0.5).to_radians()
    }
}
