/// 幾何基礎工具
///
/// 射線、線段、多邊形與包圍盒的基本運算
use ordered_float::OrderedFloat;
use vek::Vec2;

/// 平行判定閾值，行列式絕對值低於此值視為無交點
pub const PARALLEL_EPS: f32 = 1e-10;

pub struct GeometryUtils;

impl GeometryUtils {
    /// 標準化角度到 [0, 2π) 範圍
    pub fn normalize_angle(mut angle: f32) -> f32 {
        let pi2 = 2.0 * std::f32::consts::PI;
        while angle < 0.0 {
            angle += pi2;
        }
        while angle >= pi2 {
            angle -= pi2;
        }
        angle
    }

    /// 計算角度差（考慮環形性質），結果落在 [-π, π]
    pub fn angle_difference(angle1: f32, angle2: f32) -> f32 {
        let pi2 = 2.0 * std::f32::consts::PI;
        let mut diff = Self::normalize_angle(angle2) - Self::normalize_angle(angle1);

        if diff > std::f32::consts::PI {
            diff -= pi2;
        } else if diff < -std::f32::consts::PI {
            diff += pi2;
        }
        diff
    }

    /// 計算兩點間距離
    pub fn distance(p1: Vec2<f32>, p2: Vec2<f32>) -> f32 {
        (p1 - p2).magnitude()
    }

    /// 射線與線段相交檢測
    ///
    /// 回傳 (射線參數 t, 線段參數 u)；t 為沿射線方向的距離（方向需先正規化），
    /// u 限制在 [0, 1]。近平行時視為無交點。
    pub fn ray_segment_intersection(
        origin: Vec2<f32>,
        direction: Vec2<f32>,
        seg_start: Vec2<f32>,
        seg_end: Vec2<f32>,
    ) -> Option<(f32, f32)> {
        let seg_dir = seg_end - seg_start;
        let det = direction.x * seg_dir.y - direction.y * seg_dir.x;

        if det.abs() < PARALLEL_EPS {
            return None;
        }

        let to_start = seg_start - origin;
        let t = (to_start.x * seg_dir.y - to_start.y * seg_dir.x) / det;
        let u = (to_start.x * direction.y - to_start.y * direction.x) / det;

        if t >= 0.0 && u >= 0.0 && u <= 1.0 {
            Some((t, u))
        } else {
            None
        }
    }

    /// 線段相交檢測
    pub fn segments_intersect(
        p1: Vec2<f32>,
        q1: Vec2<f32>,
        p2: Vec2<f32>,
        q2: Vec2<f32>,
    ) -> Option<Vec2<f32>> {
        let d1 = q1 - p1;
        let d2 = q2 - p2;
        let cross = d1.x * d2.y - d1.y * d2.x;

        if cross.abs() < PARALLEL_EPS {
            return None; // 平行線段
        }

        let t1 = ((p2.x - p1.x) * d2.y - (p2.y - p1.y) * d2.x) / cross;
        let t2 = ((p2.x - p1.x) * d1.y - (p2.y - p1.y) * d1.x) / cross;

        if t1 >= 0.0 && t1 <= 1.0 && t2 >= 0.0 && t2 <= 1.0 {
            Some(p1 + d1 * t1)
        } else {
            None
        }
    }

    /// 計算點到線段的最短距離
    pub fn point_to_segment_distance(
        point: Vec2<f32>,
        seg_start: Vec2<f32>,
        seg_end: Vec2<f32>,
    ) -> f32 {
        let seg_vec = seg_end - seg_start;
        let point_vec = point - seg_start;

        let seg_length_sq = seg_vec.magnitude_squared();
        if seg_length_sq == 0.0 {
            return point_vec.magnitude();
        }

        let t = (point_vec.dot(seg_vec) / seg_length_sq).max(0.0).min(1.0);
        let projection = seg_start + seg_vec * t;
        (point - projection).magnitude()
    }

    /// 奇偶規則判斷點是否在多邊形內
    pub fn point_in_polygon(point: Vec2<f32>, vertices: &[Vec2<f32>]) -> bool {
        if vertices.len() < 3 {
            return false;
        }

        let mut inside = false;
        let n = vertices.len();

        for i in 0..n {
            let j = (i + 1) % n;

            if ((vertices[i].y > point.y) != (vertices[j].y > point.y))
                && (point.x
                    < (vertices[j].x - vertices[i].x) * (point.y - vertices[i].y)
                        / (vertices[j].y - vertices[i].y)
                        + vertices[i].x)
            {
                inside = !inside;
            }
        }

        inside
    }

    /// Graham 掃描法凸包
    ///
    /// 取最低（同高取最左）的點為基準，其餘依極角排序後保留左轉序列
    pub fn convex_hull(mut points: Vec<Vec2<f32>>) -> Vec<Vec2<f32>> {
        if points.len() < 3 {
            return points;
        }

        let mut pivot_idx = 0;
        for (i, p) in points.iter().enumerate() {
            let best = points[pivot_idx];
            if p.y < best.y || (p.y == best.y && p.x < best.x) {
                pivot_idx = i;
            }
        }
        let pivot = points.swap_remove(pivot_idx);

        // 依極角排序，同角度時近者在前
        points.sort_by_key(|p| {
            let d = *p - pivot;
            (
                OrderedFloat(d.y.atan2(d.x)),
                OrderedFloat(d.magnitude_squared()),
            )
        });

        let mut hull: Vec<Vec2<f32>> = vec![pivot];
        for p in points {
            while hull.len() >= 2 {
                let a = hull[hull.len() - 2];
                let b = hull[hull.len() - 1];
                let cross = (b - a).x * (p - a).y - (b - a).y * (p - a).x;
                if cross <= 0.0 {
                    hull.pop();
                } else {
                    break;
                }
            }
            hull.push(p);
        }

        hull
    }

    /// 多邊形面積（鞋帶公式）
    pub fn polygon_area(vertices: &[Vec2<f32>]) -> f32 {
        if vertices.len() < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        let n = vertices.len();

        for i in 0..n {
            let j = (i + 1) % n;
            area += vertices[i].x * vertices[j].y;
            area -= vertices[j].x * vertices[i].y;
        }

        area.abs() / 2.0
    }
}

/// 邊界矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2<f32>,
    pub max: Vec2<f32>,
}

impl Bounds {
    pub fn new(min: Vec2<f32>, max: Vec2<f32>) -> Self {
        Self { min, max }
    }

    /// 由點集建立包圍盒；空集合回傳 None
    pub fn from_points(points: &[Vec2<f32>]) -> Option<Self> {
        let first = *points.first()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    pub fn contains_point(&self, point: Vec2<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// 檢查是否完全涵蓋另一個包圍盒
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    /// 檢查兩個包圍盒是否相交
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// 兩包圍盒的聯集
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
