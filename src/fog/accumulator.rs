/// 戰爭迷霧累積器
///
/// 持久保存曾經可見的區域；集合只增不減，外部「重設迷霧」動作
/// 以外不會移除任何已揭露範圍
use hashbrown::HashSet;
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use vek::Vec2;

use super::simplify::{PolygonSimplifier, COLLINEAR_TOL};
use crate::vision::geometry::{Bounds, GeometryUtils};
use crate::vision::polygon::VisionPolygon;

/// 合併去重時的座標量化步長（像素）
const MERGE_DEDUP_STEP: f32 = 0.1;

/// 已揭露的迷霧多邊形
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogPolygon {
    /// 識別碼
    pub id: Uuid,
    /// 多邊形頂點
    pub points: Vec<Vec2<f32>>,
    /// 揭露時間（unix 秒）
    pub timestamp: f64,
    /// 揭露此區域的單位
    pub revealed_by: String,
}

impl FogPolygon {
    /// 包圍盒
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }
}

/// 累積統計
#[derive(Debug, Default, Clone)]
pub struct FogStats {
    /// 揭露次數
    pub reveals: usize,
    /// 合併次數
    pub merges: usize,
    /// 簡化移除的頂點數
    pub points_pruned: usize,
    /// 忽略的退化輸入次數
    pub degenerate_inputs: usize,
}

pub struct FogAccumulator {
    /// 已揭露多邊形集合
    polygons: Vec<FogPolygon>,
    /// 共線剪除容差（像素）
    collinear_tolerance: f32,
    /// 累積統計
    stats: FogStats,
}

impl FogAccumulator {
    pub fn new() -> Self {
        Self::with_tolerance(COLLINEAR_TOL)
    }

    pub fn with_tolerance(collinear_tolerance: f32) -> Self {
        Self {
            polygons: Vec::new(),
            collinear_tolerance,
            stats: FogStats::default(),
        }
    }

    /// 將視野多邊形併入已揭露集合
    ///
    /// 不足三點的多邊形視為未揭露任何區域（無操作，非錯誤）。
    /// 合併策略是包圍盒重疊配對後取頂點凸包的有界近似，不是精確聯集；
    /// 凸包可能多揭露成員之間的凹陷區域，但絕不縮小任何已揭露範圍。
    pub fn reveal(&mut self, polygon: &VisionPolygon, token_id: &str, now: f64) {
        if polygon.points.len() < 3 {
            self.stats.degenerate_inputs += 1;
            debug!(
                "忽略退化視野多邊形（{} 點，來自 {}）",
                polygon.points.len(),
                token_id
            );
            return;
        }

        let incoming_bounds = Bounds::from_points(&polygon.points);

        self.polygons.push(FogPolygon {
            id: Uuid::new_v4(),
            points: polygon.points.clone(),
            timestamp: now,
            revealed_by: token_id.to_string(),
        });
        self.stats.reveals += 1;

        self.merge_overlapping();
        self.simplify_all();

        // 迷霧只增不減：合併後整體邊界必須涵蓋新輸入
        if let (Some(incoming), Some(total)) = (incoming_bounds, self.total_bounds()) {
            debug_assert!(
                total.contains_bounds(&incoming),
                "fog accumulator lost revealed area"
            );
        }
    }

    /// 檢查點是否已被揭露
    pub fn is_revealed(&self, point: Vec2<f32>) -> bool {
        self.polygons
            .iter()
            .any(|fog| GeometryUtils::point_in_polygon(point, &fog.points))
    }

    /// 反覆合併包圍盒重疊的多邊形
    fn merge_overlapping(&mut self) {
        loop {
            let mut overlapping: Option<(usize, usize)> = None;
            'search: for i in 0..self.polygons.len() {
                for j in (i + 1)..self.polygons.len() {
                    if let (Some(a), Some(b)) = (self.polygons[i].bounds(), self.polygons[j].bounds())
                    {
                        if a.intersects(&b) {
                            overlapping = Some((i, j));
                            break 'search;
                        }
                    }
                }
            }

            match overlapping {
                Some((i, j)) => {
                    let other = self.polygons.swap_remove(j);
                    let target = &mut self.polygons[i];
                    target.points.extend(other.points);
                    let merged = Self::dedup_points(&target.points);
                    // 直接串接兩個環會自交，奇偶測試會丟失內部點；
                    // 凸包保證合併結果涵蓋兩個成員的全部區域
                    target.points = GeometryUtils::convex_hull(merged);
                    target.timestamp = target.timestamp.min(other.timestamp);
                    self.stats.merges += 1;
                }
                None => break,
            }
        }
    }

    /// 量化座標去重，重複揭露同一區域時避免頂點無限堆積
    fn dedup_points(points: &[Vec2<f32>]) -> Vec<Vec2<f32>> {
        let mut seen: HashSet<(i64, i64)> = HashSet::new();
        let mut out = Vec::with_capacity(points.len());
        for &p in points {
            let key = (
                (p.x / MERGE_DEDUP_STEP).round() as i64,
                (p.y / MERGE_DEDUP_STEP).round() as i64,
            );
            if seen.insert(key) {
                out.push(p);
            }
        }
        out
    }

    /// 簡化所有多邊形以控制記憶體成長
    fn simplify_all(&mut self) {
        for fog in &mut self.polygons {
            let before = fog.points.len();
            let simplified = PolygonSimplifier::prune_collinear(&fog.points, self.collinear_tolerance);
            if simplified.len() < before {
                self.stats.points_pruned += before - simplified.len();
                fog.points = simplified;
            }
        }
    }

    /// 已揭露多邊形集合（持久化協作端保存用）
    pub fn polygons(&self) -> &[FogPolygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// 集合中的頂點總數
    pub fn total_points(&self) -> usize {
        self.polygons.iter().map(|fog| fog.points.len()).sum()
    }

    /// 整體邊界
    pub fn total_bounds(&self) -> Option<Bounds> {
        let mut iter = self.polygons.iter().filter_map(|fog| fog.bounds());
        let first = iter.next()?;
        Some(iter.fold(first, |acc, b| acc.union(&b)))
    }

    /// 累積統計
    pub fn stats(&self) -> &FogStats {
        &self.stats
    }

    /// 全面重置（對應外部的「重設迷霧」動作）
    pub fn reset(&mut self) {
        self.polygons.clear();
        self.stats = FogStats::default();
    }

    /// 由持久化資料還原
    pub fn restore(&mut self, polygons: Vec<FogPolygon>) {
        self.polygons = polygons
            .into_iter()
            .filter(|fog| fog.points.len() >= 3)
            .collect();
    }
}

impl Default for FogAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// 執行緒間共享的迷霧累積器
///
/// 迷霧集合是多單位計算唯一的共享寫入點，reveal 以互斥鎖序列化
#[derive(Clone)]
pub struct SharedFogAccumulator {
    inner: Arc<Mutex<FogAccumulator>>,
}

impl SharedFogAccumulator {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FogAccumulator::new())),
        }
    }

    pub fn reveal(&self, polygon: &VisionPolygon, token_id: &str, now: f64) {
        self.inner.lock().reveal(polygon, token_id, now);
    }

    pub fn is_revealed(&self, point: Vec2<f32>) -> bool {
        self.inner.lock().is_revealed(point)
    }

    /// 目前集合的快照
    pub fn snapshot(&self) -> Vec<FogPolygon> {
        self.inner.lock().polygons().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for SharedFogAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
