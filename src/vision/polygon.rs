/// 視野結果與光源類型
use serde::{Deserialize, Serialize};
use vek::Vec2;

use super::geometry::GeometryUtils;
use super::profile::VisionMode;

/// 光照等級，疊加時取最大值（亮光 > 微光 > 黑暗）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LightLevel {
    /// 黑暗
    Dark,
    /// 微光
    Dim,
    /// 亮光
    Bright,
}

/// 光源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightSource {
    /// 位置（像素）
    pub position: Vec2<f32>,
    /// 是否發光
    pub emits_light: bool,
    /// 亮光半徑（呎）
    pub bright_radius: f32,
    /// 微光半徑（呎，從亮光邊緣起算）
    pub dim_radius: f32,
    /// 顏色
    pub color: Option<String>,
    /// 強度
    pub intensity: f32,
    /// 顏色強度
    pub color_intensity: f32,
}

impl LightSource {
    pub fn new(position: Vec2<f32>, bright_radius: f32, dim_radius: f32) -> Self {
        Self {
            position,
            emits_light: true,
            bright_radius,
            dim_radius,
            color: None,
            intensity: 1.0,
            color_intensity: 0.5,
        }
    }
}

/// 角度掃描過程中的暫時端點，多邊形定案後即丟棄
#[derive(Debug, Clone)]
pub struct VisionEndpoint {
    /// 端點位置
    pub point: Vec2<f32>,
    /// 相對原點的角度（弧度）
    pub angle: f32,
    /// 距離原點的距離
    pub distance: f32,
    /// 候選角度是否來自牆頂點
    pub is_wall_vertex: bool,
    /// 命中的牆識別碼
    pub wall_id: Option<String>,
}

/// 視野多邊形
///
/// 依角度排序的封閉頂點環；視覺停用或距離為零時為空（可繪製為「無視野」）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionPolygon {
    /// 依角度排序的頂點環
    pub points: Vec<Vec2<f32>>,
    /// 視野距離（像素）
    pub range: f32,
    /// 使用的視覺模式
    pub mode: VisionMode,
    /// 視野角度（度；全向時為 None）
    pub cone_angle: Option<f32>,
    /// 面向（度；全向時為 None）
    pub rotation: Option<f32>,
}

impl VisionPolygon {
    /// 空視野
    pub fn empty(mode: VisionMode) -> Self {
        Self {
            points: Vec::new(),
            range: 0.0,
            mode,
            cone_angle: None,
            rotation: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 檢查點是否在可見區域內
    pub fn is_point_visible(&self, point: Vec2<f32>) -> bool {
        GeometryUtils::point_in_polygon(point, &self.points)
    }

    /// 可見區域面積
    pub fn area(&self) -> f32 {
        GeometryUtils::polygon_area(&self.points)
    }
}
