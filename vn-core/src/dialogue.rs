//! # Dialogue 模块
//!
//! 对话展示状态机：管理当前对话行及其打字机显示进度。
//!
//! ## 状态转换
//!
//! ```text
//! Idle           -> 无对话行
//! Revealing      -> 有对话行，逐字显示中
//! FullyRevealed  -> 有对话行，已全部显示
//!
//! set_line        : 任意状态 -> Revealing（空文本 -> Idle）
//! advance_input   : Revealing -> FullyRevealed（跳过效果）
//!                   FullyRevealed -> Idle（消除对话行）
//!                   Idle -> 无操作
//! tick(dt)        : 仅在 Revealing 有效，可能触发 -> FullyRevealed
//! ```
//!
//! 状态中同一时刻至多只有一行对话，新行整体替换旧行，没有队列。

use serde::{Deserialize, Serialize};

use crate::typewriter::{DEFAULT_CHARS_PER_SECOND, Typewriter};

/// 一行对话
///
/// `speaker` 为空字符串表示旁白（无名字框）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// 说话者标识（空 = 旁白）
    pub speaker: String,
    /// 名字框中显示的名称
    pub display_name: String,
    /// 完整对话文本
    pub text: String,
}

impl DialogueLine {
    /// 是否是旁白行
    pub fn is_narration(&self) -> bool {
        self.speaker.is_empty()
    }

    /// 文本的字符总数（Unicode 标量值）
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// 对话状态机的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialoguePhase {
    /// 无对话行
    Idle,
    /// 逐字显示中
    Revealing,
    /// 已全部显示，等待消除
    FullyRevealed,
}

/// 对话状态机
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueState {
    /// 当前对话行（None = Idle）
    line: Option<DialogueLine>,
    /// 打字机进度
    typewriter: Typewriter,
    /// 显示速度（字符/秒）
    chars_per_second: f32,
}

impl DialogueState {
    /// 创建空闲状态，使用默认显示速度
    pub fn new() -> Self {
        Self::with_speed(DEFAULT_CHARS_PER_SECOND)
    }

    /// 创建空闲状态，指定显示速度
    pub fn with_speed(chars_per_second: f32) -> Self {
        Self {
            line: None,
            typewriter: Typewriter::new(),
            chars_per_second,
        }
    }

    /// 设置新的对话行
    ///
    /// 整体替换当前行并重置打字机进度。空文本直接回到 Idle。
    pub fn set_line(
        &mut self,
        speaker: impl Into<String>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) {
        let text = text.into();
        self.typewriter.reset();

        if text.is_empty() {
            self.line = None;
        } else {
            self.line = Some(DialogueLine {
                speaker: speaker.into(),
                display_name: display_name.into(),
                text,
            });
        }
    }

    /// 处理确认输入（点击/按键）
    ///
    /// - `Revealing`：跳到全部显示
    /// - `FullyRevealed`：消除当前行，回到 `Idle`
    /// - `Idle`：无操作（幂等）
    pub fn advance_input(&mut self) {
        match self.phase() {
            DialoguePhase::Revealing => {
                let total = self.line.as_ref().map(DialogueLine::char_count).unwrap_or(0);
                self.typewriter.complete(total);
            }
            DialoguePhase::FullyRevealed => {
                self.line = None;
                self.typewriter.reset();
            }
            DialoguePhase::Idle => {}
        }
    }

    /// 按流逝时间推进打字机效果
    ///
    /// 仅在 `Revealing` 阶段有效；可能触发向 `FullyRevealed` 的转换。
    pub fn tick(&mut self, dt: f32) {
        if let Some(line) = &self.line {
            self.typewriter
                .advance(dt, line.char_count(), self.chars_per_second);
        }
    }

    /// 当前阶段
    pub fn phase(&self) -> DialoguePhase {
        match &self.line {
            None => DialoguePhase::Idle,
            Some(line) => {
                if self.typewriter.is_complete(line.char_count()) {
                    DialoguePhase::FullyRevealed
                } else {
                    DialoguePhase::Revealing
                }
            }
        }
    }

    /// 是否无对话行
    pub fn is_idle(&self) -> bool {
        self.line.is_none()
    }

    /// 当前对话行
    pub fn line(&self) -> Option<&DialogueLine> {
        self.line.as_ref()
    }

    /// 已显示的字符数
    pub fn revealed_count(&self) -> usize {
        self.typewriter.revealed()
    }

    /// 已显示的文本前缀（按字符边界截取）
    pub fn revealed_text(&self) -> Option<&str> {
        let line = self.line.as_ref()?;
        let prefix = match line.text.char_indices().nth(self.typewriter.revealed()) {
            Some((byte_idx, _)) => &line.text[..byte_idx],
            None => line.text.as_str(),
        };
        Some(prefix)
    }

    /// 显示速度（字符/秒）
    pub fn chars_per_second(&self) -> f32 {
        self.chars_per_second
    }
}

impl Default for DialogueState {
    fn default() -> Self {
        Self::new()
    }
}
