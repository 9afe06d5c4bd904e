/// 單位視覺能力定義
use serde::{Deserialize, Serialize};
use vek::Vec2;

/// 視覺模式
///
/// 封閉列舉取代字串模式，讓牆過濾與光照判定可以窮舉比對
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisionMode {
    /// 一般視覺
    Basic,
    /// 黑暗視覺
    Darkvision,
    /// 盲視
    Blindsight,
    /// 震動感知
    Tremorsense,
    /// 真實視覺
    Truesight,
}

impl VisionMode {
    /// 模式優先度，數值越大越優先
    pub fn priority(self) -> u8 {
        match self {
            VisionMode::Basic => 0,
            VisionMode::Darkvision => 1,
            VisionMode::Tremorsense => 2,
            VisionMode::Blindsight => 3,
            VisionMode::Truesight => 4,
        }
    }

    /// 是否無視黑暗
    pub fn ignores_darkness(self) -> bool {
        !matches!(self, VisionMode::Basic)
    }
}

/// 單位視覺設定
///
/// 每次計算只會有一個生效模式，依優先度從已獲得（距離 > 0）的感官中選出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionProfile {
    /// 是否啟用視覺
    pub enabled: bool,
    /// 一般視覺距離（呎）
    pub range: f32,
    /// 黑暗視覺距離（呎，0 表示未獲得）
    pub darkvision: f32,
    /// 盲視距離（呎，0 表示未獲得）
    pub blindsight: f32,
    /// 震動感知距離（呎，0 表示未獲得）
    pub tremorsense: f32,
    /// 真實視覺距離（呎，0 表示未獲得）
    pub truesight: f32,
    /// 明確指定的模式（未指定時依優先度推導）
    pub mode: Option<VisionMode>,
    /// 視野角度（度，360 表示全向）
    pub angle: f32,
    /// 面向（度）
    pub rotation: f32,
}

impl Default for VisionProfile {
    fn default() -> Self {
        Self {
            enabled: true,
            range: 60.0,
            darkvision: 0.0,
            blindsight: 0.0,
            tremorsense: 0.0,
            truesight: 0.0,
            mode: None,
            angle: 360.0,
            rotation: 0.0,
        }
    }
}

impl VisionProfile {
    /// 建立指定一般視距的設定
    pub fn new(range: f32) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    /// 設定黑暗視覺距離
    pub fn with_darkvision(mut self, feet: f32) -> Self {
        self.darkvision = feet;
        self
    }

    /// 設定盲視距離
    pub fn with_blindsight(mut self, feet: f32) -> Self {
        self.blindsight = feet;
        self
    }

    /// 設定震動感知距離
    pub fn with_tremorsense(mut self, feet: f32) -> Self {
        self.tremorsense = feet;
        self
    }

    /// 設定真實視覺距離
    pub fn with_truesight(mut self, feet: f32) -> Self {
        self.truesight = feet;
        self
    }

    /// 設定面向扇形
    pub fn with_cone(mut self, angle_deg: f32, rotation_deg: f32) -> Self {
        self.angle = angle_deg;
        self.rotation = rotation_deg;
        self
    }

    /// 是否受視野角度限制
    pub fn has_facing_cone(&self) -> bool {
        self.angle < 360.0
    }
}

/// 單一計算所需的單位視覺資料
///
/// 位置與旗標由場景協作端提供，核心只讀取不持有狀態
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenVision {
    /// 單位識別碼
    pub id: String,
    /// 地圖位置（像素）
    pub position: Vec2<f32>,
    /// 所在高度層
    pub elevation: f32,
    /// 視覺設定
    pub profile: VisionProfile,
}

impl TokenVision {
    pub fn new(id: impl Into<String>, position: Vec2<f32>, profile: VisionProfile) -> Self {
        Self {
            id: id.into(),
            position,
            elevation: 0.0,
            profile,
        }
    }

    /// 設定高度層
    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }
}
