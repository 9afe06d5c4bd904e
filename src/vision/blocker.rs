/// 視線遮擋牆
use serde::{Deserialize, Serialize};
use vek::Vec2;

use super::geometry::Bounds;

/// 遮擋牆：開放折線，頂點超過兩個時視為封閉多邊形
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionBlocker {
    /// 牆的識別碼
    pub id: String,
    /// 頂點序列（至少 2 個）
    pub points: Vec<Vec2<f32>>,
    /// 是否阻擋光線
    pub blocks_light: bool,
    /// 是否阻擋移動
    pub blocks_movement: bool,
}

impl VisionBlocker {
    /// 建立同時阻光阻移動的牆
    pub fn new(id: impl Into<String>, points: Vec<Vec2<f32>>) -> Self {
        Self {
            id: id.into(),
            points,
            blocks_light: true,
            blocks_movement: true,
        }
    }

    /// 設定阻擋旗標
    pub fn with_flags(mut self, blocks_light: bool, blocks_movement: bool) -> Self {
        self.blocks_light = blocks_light;
        self.blocks_movement = blocks_movement;
        self
    }

    /// 頂點不足兩個的牆不構成遮擋
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// 列出所有線段；封閉多邊形時包含首尾閉合段
    pub fn segments(&self) -> Vec<(Vec2<f32>, Vec2<f32>)> {
        if self.is_degenerate() {
            return Vec::new();
        }

        let mut segments = Vec::with_capacity(self.points.len());
        for pair in self.points.windows(2) {
            segments.push((pair[0], pair[1]));
        }
        if self.points.len() > 2 {
            segments.push((self.points[self.points.len() - 1], self.points[0]));
        }
        segments
    }

    /// 包圍盒
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }
}
