/// 多邊形簡化
///
/// 先以廉價的共線剪除控制記憶體成長，需要更緊的結果時再用 Douglas–Peucker
use vek::Vec2;

use crate::vision::geometry::GeometryUtils;

/// 共線判定的像素容差
pub const COLLINEAR_TOL: f32 = 0.5;

pub struct PolygonSimplifier;

impl PolygonSimplifier {
    /// 移除與相鄰兩點近似共線的頂點
    ///
    /// 以頂點到前後兩點弦線的垂直偏差判定；剪除後不足三點時
    /// 保留原多邊形（已揭露區域不可縮小）
    pub fn prune_collinear(points: &[Vec2<f32>], tolerance: f32) -> Vec<Vec2<f32>> {
        if points.len() < 3 {
            return points.to_vec();
        }

        let n = points.len();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let curr = points[i];
            let next = points[(i + 1) % n];

            if Self::chord_deviation(prev, curr, next) > tolerance {
                out.push(curr);
            }
        }

        if out.len() < 3 {
            points.to_vec()
        } else {
            out
        }
    }

    /// 頂點到前後弦線的垂直偏差
    fn chord_deviation(prev: Vec2<f32>, curr: Vec2<f32>, next: Vec2<f32>) -> f32 {
        let chord = next - prev;
        let base = chord.magnitude();
        if base < f32::EPSILON {
            return (curr - prev).magnitude();
        }
        let cross = chord.x * (curr - prev).y - chord.y * (curr - prev).x;
        cross.abs() / base
    }

    /// Douglas–Peucker 簡化
    ///
    /// 遞歸保留偏離弦線最遠且超過 epsilon 的頂點，否則整段收斂為兩端點
    pub fn douglas_peucker(points: &[Vec2<f32>], epsilon: f32) -> Vec<Vec2<f32>> {
        if points.len() < 3 {
            return points.to_vec();
        }

        let mut keep = vec![false; points.len()];
        keep[0] = true;
        keep[points.len() - 1] = true;
        Self::dp_recurse(points, 0, points.len() - 1, epsilon, &mut keep);

        points
            .iter()
            .zip(keep)
            .filter_map(|(p, kept)| if kept { Some(*p) } else { None })
            .collect()
    }

    fn dp_recurse(points: &[Vec2<f32>], start: usize, end: usize, epsilon: f32, keep: &mut [bool]) {
        if end <= start + 1 {
            return;
        }

        let mut max_distance = 0.0;
        let mut max_index = start;
        for i in (start + 1)..end {
            let distance =
                GeometryUtils::point_to_segment_distance(points[i], points[start], points[end]);
            if distance > max_distance {
                max_distance = distance;
                max_index = i;
            }
        }

        if max_distance > epsilon {
            keep[max_index] = true;
            Self::dp_recurse(points, start, max_index, epsilon, keep);
            Self::dp_recurse(points, max_index, end, epsilon, keep);
        }
    }
}
