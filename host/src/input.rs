//! # Input 模块
//!
//! 平台事件到引擎动作的映射。
//!
//! 事件类型与具体窗口后端解耦，宿主把后端事件翻译为 [`Event`]，
//! 引擎只处理 [`EngineAction`]。

use serde::{Deserialize, Serialize};

/// 按键标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Space,
    Enter,
    Escape,
    /// 其他按键（平台原始键码）
    Other(u32),
}

/// 平台输入事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// 窗口关闭请求
    Quit,
    /// 按键按下
    KeyDown(KeyCode),
    /// 鼠标左键按下
    MouseDown,
    /// 其他平台事件
    Unknown,
}

/// 引擎动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineAction {
    /// 退出
    Quit,
    /// 推进对话（跳过效果 / 消除对话行）
    Advance,
    /// 忽略
    None,
}

/// 事件映射
///
/// - 空格 / 回车 / 鼠标左键 -> 推进
/// - Esc / 窗口关闭 -> 退出
/// - 其余按键忽略
pub fn map_event(event: Event) -> EngineAction {
    match event {
        Event::Quit => EngineAction::Quit,
        Event::KeyDown(KeyCode::Escape) => EngineAction::Quit,
        Event::KeyDown(KeyCode::Space) | Event::KeyDown(KeyCode::Enter) => EngineAction::Advance,
        Event::MouseDown => EngineAction::Advance,
        Event::KeyDown(KeyCode::Other(_)) | Event::Unknown => EngineAction::None,
    }
}
