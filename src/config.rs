/// 場景環境設定
use failure::Error;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;

use crate::vision::polygon::LightLevel;

/// 每個 5 呎方格的預設像素數
pub const DEFAULT_GRID_SIZE_PX: f32 = 50.0;

/// 場景環境：格線大小與照明設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEnvironment {
    /// 每個 5 呎方格的像素數
    pub grid_size_px: f32,
    /// 場景全域照明，啟用時覆蓋所有光源計算
    pub global_light: bool,
    /// 無光源照到時的環境光等級
    pub ambient_light: LightLevel,
}

impl Default for SceneEnvironment {
    fn default() -> Self {
        Self {
            grid_size_px: DEFAULT_GRID_SIZE_PX,
            global_light: false,
            ambient_light: LightLevel::Dark,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SceneSetting {
    scene: SceneEnvironment,
}

impl SceneEnvironment {
    /// 呎轉像素
    pub fn feet_to_px(&self, feet: f32) -> f32 {
        feet * (self.pixels_per_foot())
    }

    /// 像素轉呎
    pub fn px_to_feet(&self, px: f32) -> f32 {
        px / self.pixels_per_foot()
    }

    fn pixels_per_foot(&self) -> f32 {
        let grid = if self.grid_size_px > 0.0 {
            self.grid_size_px
        } else {
            DEFAULT_GRID_SIZE_PX
        };
        grid / 5.0
    }

    /// 自 toml 設定檔載入
    pub fn from_file(path: &str) -> Result<Self, Error> {
        let mut file = File::open(path)?;
        let mut raw = String::new();
        file.read_to_string(&mut raw)?;
        let setting: SceneSetting = toml::from_str(&raw)?;
        Ok(setting.scene)
    }
}

lazy_static! {
    /// 預設場景環境；找不到 scene.toml 時使用內建預設值
    pub static ref SCENE_ENV: SceneEnvironment =
        SceneEnvironment::from_file("scene.toml").unwrap_or_default();
}
