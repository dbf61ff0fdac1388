//! # Typewriter 模块
//!
//! 打字机效果的纯时间推进计数器。
//!
//! ## 设计说明
//!
//! - 只依赖累计时间，不依赖帧率：小数余量跨帧保留，
//!   同样的总时长无论如何切分 dt，显示的字符数都一致
//! - 字符计数基于 Unicode 标量值（`char`），与 UTF-8 字节数无关

use serde::{Deserialize, Serialize};

/// 默认显示速度（字符/秒）
pub const DEFAULT_CHARS_PER_SECOND: f32 = 60.0;

/// 打字机进度
///
/// 记录当前行已显示的字符数和尚未折算为字符的累计时间。
///
/// # 不变量
///
/// - `revealed <= 当前行的字符总数`（由 [`advance`](Self::advance) 保证）
/// - `accumulated >= 0`，且在一次推进后小于 `1 / chars_per_second`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Typewriter {
    /// 已显示的字符数
    revealed: usize,
    /// 未折算的累计时间（秒）
    accumulated: f32,
}

impl Typewriter {
    /// 创建归零的进度
    pub fn new() -> Self {
        Self {
            revealed: 0,
            accumulated: 0.0,
        }
    }

    /// 重置进度（换行时调用）
    pub fn reset(&mut self) {
        self.revealed = 0;
        self.accumulated = 0.0;
    }

    /// 按流逝时间推进
    ///
    /// # 参数
    ///
    /// - `dt`: 本帧流逝时间（秒），允许为 0
    /// - `total`: 当前行的字符总数
    /// - `chars_per_second`: 显示速度，必须为正
    ///
    /// 已完成时不再累计时间。折算后的小数余量保留到下一帧。
    pub fn advance(&mut self, dt: f32, total: usize, chars_per_second: f32) {
        if self.revealed >= total {
            return;
        }

        self.accumulated += dt;

        let to_add = (self.accumulated * chars_per_second).floor() as usize;
        if to_add > 0 {
            self.revealed = (self.revealed + to_add).min(total);
            // 保留小数余量，避免低帧率下的节奏抖动
            self.accumulated -= to_add as f32 / chars_per_second;
        }
    }

    /// 立即显示全部字符（跳过效果）
    pub fn complete(&mut self, total: usize) {
        self.revealed = total;
        self.accumulated = 0.0;
    }

    /// 已显示的字符数
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// 是否已显示完毕
    pub fn is_complete(&self, total: usize) -> bool {
        self.revealed >= total
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new()
    }
}
