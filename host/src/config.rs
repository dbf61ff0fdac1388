//! # Config 模块
//!
//! JSON 配置文件的加载与校验。
//!
//! 配置文件缺失或无效时回退到默认配置并记录警告，启动不中断；
//! 字段缺失时逐字段取默认值。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use vn_core::DEFAULT_CHARS_PER_SECOND;

/// 配置校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("窗口尺寸无效: {width}x{height}")]
    InvalidWindowSize { width: u32, height: u32 },

    #[error("显示速度必须为正: {value}")]
    InvalidCharsPerSecond { value: f32 },

    #[error("字号必须为正: {value}")]
    InvalidFontSize { value: f32 },
}

/// 窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Aster VN Engine".to_string(),
            fullscreen: false,
        }
    }
}

/// 文本显示配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// 打字机速度（字符/秒）
    pub chars_per_second: f32,
    /// 字号（像素）
    pub font_px: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            chars_per_second: DEFAULT_CHARS_PER_SECOND,
            font_px: 36.0,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 资产根目录
    pub assets_root: PathBuf,
    /// 启动脚本（相对资产根目录）
    pub start_script: String,
    /// 字体文件（相对资产根目录）
    pub font: String,
    pub window: WindowConfig,
    pub text: TextConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("assets"),
            start_script: "scripts/demo.vns".to_string(),
            font: "fonts/Montserrat-Medium.ttf".to_string(),
            window: WindowConfig::default(),
            text: TextConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    ///
    /// 文件缺失或解析失败时记录警告并返回默认配置。
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "配置文件读取失败，使用默认配置");
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "配置文件解析失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: self.window.width,
                height: self.window.height,
            });
        }
        if self.text.chars_per_second <= 0.0 {
            return Err(ConfigError::InvalidCharsPerSecond {
                value: self.text.chars_per_second,
            });
        }
        if self.text.font_px <= 0.0 {
            return Err(ConfigError::InvalidFontSize {
                value: self.text.font_px,
            });
        }
        Ok(())
    }

    /// 启动脚本的完整路径
    pub fn start_script_path(&self) -> PathBuf {
        self.assets_root.join(&self.start_script)
    }

    /// 字体文件的完整路径
    pub fn font_path(&self) -> PathBuf {
        self.assets_root.join(&self.font)
    }
}
