//! # vn-core
//!
//! 视觉小说引擎的平台无关核心：脚本解析、指令执行、对话状态机
//! 与画面合成。不做任何 IO，不依赖图形后端。
//!
//! ## 架构
//!
//! ```text
//! 脚本文本 --parse--> Script --pump--> ScriptCommand
//!                                         |
//!                                    DialogueState（打字机）
//!                                         |
//!                     FrameSnapshot --compose--> Vec<DrawOp>
//! ```
//!
//! - [`script`]：行式脚本文本的解析
//! - [`command`]：指令类型与分发表
//! - [`driver`]：泵式脚本执行驱动
//! - [`dialogue`] / [`typewriter`]：对话状态机与逐字显示
//! - [`presenter`]：纯函数画面合成
//! - [`error`]：错误类型
//!
//! 纹理加载、文本栅格化、输入映射等与平台相关的部分在 host crate 中。

pub mod command;
pub mod dialogue;
pub mod driver;
pub mod error;
pub mod presenter;
pub mod script;
pub mod typewriter;

pub use command::{CommandTable, Invocation, ScriptCommand, DEFAULT_POSE, NARRATOR_NAME};
pub use dialogue::{DialogueLine, DialoguePhase, DialogueState};
pub use driver::{PumpResult, ScriptDriver};
pub use error::{CommandError, ParseError, VnError, VnResult};
pub use presenter::{
    compose, CharacterSprite, DialogueSnapshot, DrawKind, DrawOp, FrameSnapshot, Rect, Viewport,
};
pub use script::Script;
pub use typewriter::{Typewriter, DEFAULT_CHARS_PER_SECOND};
