//! 资产目录的路径约定
//!
//! ```text
//! <assets_root>/
//!   bg/             背景图
//!   characters/     立绘，命名为 <id>_<pose>.png
//!   fonts/          字体
//!   scripts/        脚本
//! ```

use std::path::{Path, PathBuf};

/// 背景图路径：`<root>/bg/<name>`
pub fn background_path(root: &Path, name: &str) -> PathBuf {
    root.join("bg").join(name)
}

/// 立绘路径：`<root>/characters/<id>_<pose>.png`
pub fn character_path(root: &Path, id: &str, pose: &str) -> PathBuf {
    root.join("characters").join(format!("{id}_{pose}.png"))
}

/// 资产根目录下的相对路径（字体、脚本等）
pub fn asset_path(root: &Path, relative: &str) -> PathBuf {
    root.join(relative)
}
