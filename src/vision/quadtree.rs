/// 牆空間索引（四叉樹）
///
/// 大場景下先以包圍盒篩出掃描範圍內的牆，再交給建構器投射
use vek::Vec2;

use hashbrown::HashSet;

use super::blocker::VisionBlocker;
use super::geometry::Bounds;

/// 四叉樹節點
#[derive(Debug, Clone)]
struct IndexNode {
    /// 節點邊界
    bounds: Bounds,
    /// 子節點（NW, NE, SW, SE）
    children: Option<Box<[IndexNode; 4]>>,
    /// 存放的牆
    walls: Vec<VisionBlocker>,
    /// 節點深度
    depth: usize,
}

pub struct WallIndex {
    root: Option<IndexNode>,
    max_tree_depth: usize,
    max_walls_per_node: usize,
}

impl WallIndex {
    pub fn new(max_tree_depth: usize, max_walls_per_node: usize) -> Self {
        Self {
            root: None,
            max_tree_depth,
            max_walls_per_node,
        }
    }

    /// 以世界邊界與牆清單初始化
    pub fn initialize(&mut self, world_bounds: Bounds, walls: Vec<VisionBlocker>) {
        let mut root = IndexNode {
            bounds: world_bounds,
            children: None,
            walls: walls.into_iter().filter(|w| !w.is_degenerate()).collect(),
            depth: 0,
        };

        self.subdivide_node(&mut root);
        self.root = Some(root);
    }

    /// 遞歸細分節點
    fn subdivide_node(&self, node: &mut IndexNode) {
        if node.walls.len() <= self.max_walls_per_node || node.depth >= self.max_tree_depth {
            return;
        }

        let bounds = node.bounds;
        let mid_x = (bounds.min.x + bounds.max.x) * 0.5;
        let mid_y = (bounds.min.y + bounds.max.y) * 0.5;

        let quadrants = [
            // 西北
            Bounds::new(Vec2::new(bounds.min.x, mid_y), Vec2::new(mid_x, bounds.max.y)),
            // 東北
            Bounds::new(Vec2::new(mid_x, mid_y), bounds.max),
            // 西南
            Bounds::new(bounds.min, Vec2::new(mid_x, mid_y)),
            // 東南
            Bounds::new(Vec2::new(mid_x, bounds.min.y), Vec2::new(bounds.max.x, mid_y)),
        ];

        let mut children = Box::new(quadrants.map(|quadrant| IndexNode {
            bounds: quadrant,
            children: None,
            walls: Vec::new(),
            depth: node.depth + 1,
        }));

        // 牆的包圍盒可能橫跨多個象限，放入每個相交的子節點
        for wall in &node.walls {
            if let Some(wall_bounds) = wall.bounds() {
                for child in children.iter_mut() {
                    if wall_bounds.intersects(&child.bounds) {
                        child.walls.push(wall.clone());
                    }
                }
            }
        }

        node.children = Some(children);
        node.walls.clear();

        if let Some(ref mut children) = node.children {
            for child in children.iter_mut() {
                self.subdivide_node(child);
            }
        }
    }

    /// 查詢範圍內的牆（同一面牆只回傳一次）
    pub fn query_in_range(&self, center: Vec2<f32>, range: f32) -> Vec<VisionBlocker> {
        let mut results = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        if let Some(ref root) = self.root {
            let query_bounds = Bounds::new(
                center - Vec2::new(range, range),
                center + Vec2::new(range, range),
            );
            Self::query_node_recursive(root, &query_bounds, &mut seen, &mut results);
        }

        results
    }

    /// 遞歸查詢節點
    fn query_node_recursive(
        node: &IndexNode,
        query_bounds: &Bounds,
        seen: &mut HashSet<String>,
        results: &mut Vec<VisionBlocker>,
    ) {
        if !node.bounds.intersects(query_bounds) {
            return;
        }

        for wall in &node.walls {
            if let Some(wall_bounds) = wall.bounds() {
                if wall_bounds.intersects(query_bounds) && seen.insert(wall.id.clone()) {
                    results.push(wall.clone());
                }
            }
        }

        if let Some(ref children) = node.children {
            for child in children.iter() {
                Self::query_node_recursive(child, query_bounds, seen, results);
            }
        }
    }

    /// 計算四叉樹節點數量
    pub fn node_count(&self) -> usize {
        match self.root {
            Some(ref root) => Self::count_nodes_recursive(root),
            None => 0,
        }
    }

    fn count_nodes_recursive(node: &IndexNode) -> usize {
        let mut count = 1;
        if let Some(ref children) = node.children {
            for child in children.iter() {
                count += Self::count_nodes_recursive(child);
            }
        }
        count
    }
}
