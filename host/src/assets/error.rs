//! 资产加载错误类型

use std::path::PathBuf;

use thiserror::Error;

/// 纹理文件加载错误
///
/// 加载失败不影响已有资产：调用方记录日志后保留之前的画面。
#[derive(Error, Debug)]
pub enum LoadError {
    /// 文件读取失败（不存在、权限等）
    #[error("读取文件失败 {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    /// 图像解码失败
    #[error("解码图像失败 {path:?}: {message}")]
    Decode { path: PathBuf, message: String },
}

impl LoadError {
    /// 出错的文件路径
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Read { path, .. } | LoadError::Decode { path, .. } => path,
        }
    }
}
