//! # Command 模块
//!
//! 脚本指令的类型定义与分发表。
//!
//! ## 设计说明
//!
//! - 脚本文本先解析为 [`Invocation`]（指令名 + 位置参数），
//!   再经 [`CommandTable`] 校验并转换为强类型的 [`ScriptCommand`]
//! - 新增指令只需在分发表中注册一个转换函数，不修改执行逻辑
//! - 参数错误返回 [`CommandError`]，由上层决定跳过或中止

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// 默认立绘姿态
pub const DEFAULT_POSE: &str = "center";

/// 旁白行的名字框显示名
pub const NARRATOR_NAME: &str = "Narrator";

/// 一次脚本指令调用
///
/// 解析层的产物：指令名和位置参数都是未经校验的字符串。
/// `line` 为脚本中的行号（从 1 开始），用于错误定位。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// 指令名
    pub name: String,
    /// 位置参数
    pub args: Vec<String>,
    /// 脚本行号（从 1 开始）
    pub line: usize,
}

/// 强类型的脚本指令
///
/// 旁白（`narrate`）在转换时归一化为 `speaker` 为空的 [`Say`](Self::Say)，
/// 执行层不需要区分旁白和对话。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptCommand {
    /// 切换背景图
    ShowBackground { path: String },

    /// 显示角色立绘
    ShowCharacter { id: String, pose: String },

    /// 隐藏角色立绘
    HideCharacter { id: String },

    /// 显示一行对话并等待确认
    ///
    /// `speaker` 为空表示旁白。
    Say {
        speaker: String,
        display_name: String,
        text: String,
    },
}

impl ScriptCommand {
    /// 是否是阻塞指令（执行后暂停脚本，等待玩家确认）
    pub fn is_blocking(&self) -> bool {
        matches!(self, ScriptCommand::Say { .. })
    }
}

/// 转换函数签名：校验参数并生成强类型指令
type CommandFn = fn(&Invocation) -> Result<ScriptCommand, CommandError>;

/// 指令分发表
///
/// 指令名到转换函数的映射。内置指令在 [`new`](Self::new) 中注册。
pub struct CommandTable {
    commands: HashMap<&'static str, CommandFn>,
}

impl CommandTable {
    /// 创建包含全部内置指令的分发表
    pub fn new() -> Self {
        let mut commands: HashMap<&'static str, CommandFn> = HashMap::new();
        commands.insert("bg", cmd_background);
        // bg 的全称别名
        commands.insert("background", cmd_background);
        commands.insert("show", cmd_show);
        commands.insert("hide", cmd_hide);
        commands.insert("say", cmd_say);
        commands.insert("narrate", cmd_narrate);
        Self { commands }
    }

    /// 查表并转换一次调用
    pub fn resolve(&self, invocation: &Invocation) -> Result<ScriptCommand, CommandError> {
        let f = self
            .commands
            .get(invocation.name.as_str())
            .ok_or_else(|| CommandError::Unknown {
                command: invocation.name.clone(),
            })?;
        f(invocation)
    }

    /// 指令名是否已注册
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

// 函数指针表无法派生 Debug/Clone，手写占位实现
impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTable").finish_non_exhaustive()
    }
}

impl Clone for CommandTable {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// 取第 `index` 个参数，缺失时返回 [`CommandError::MissingArgument`]
fn required_arg<'a>(
    invocation: &'a Invocation,
    command: &'static str,
    index: usize,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    invocation
        .args
        .get(index)
        .map(String::as_str)
        .ok_or(CommandError::MissingArgument { command, argument })
}

/// 校验参数数量不超过 `max`
fn check_arity(
    invocation: &Invocation,
    command: &'static str,
    max: usize,
) -> Result<(), CommandError> {
    if invocation.args.len() > max {
        return Err(CommandError::TooManyArguments {
            command,
            max,
            actual: invocation.args.len(),
        });
    }
    Ok(())
}

/// `bg <path>` / `background <path>`
fn cmd_background(invocation: &Invocation) -> Result<ScriptCommand, CommandError> {
    check_arity(invocation, "bg", 1)?;
    let path = required_arg(invocation, "bg", 0, "path")?;
    if path.is_empty() {
        return Err(CommandError::InvalidArgument {
            command: "bg",
            argument: "path",
            message: "不能为空".to_string(),
        });
    }
    Ok(ScriptCommand::ShowBackground {
        path: path.to_string(),
    })
}

/// `show <id> [pose]`，姿态缺省为 [`DEFAULT_POSE`]
fn cmd_show(invocation: &Invocation) -> Result<ScriptCommand, CommandError> {
    check_arity(invocation, "show", 2)?;
    let id = required_arg(invocation, "show", 0, "id")?;
    if id.is_empty() {
        return Err(CommandError::InvalidArgument {
            command: "show",
            argument: "id",
            message: "不能为空".to_string(),
        });
    }
    let pose = invocation
        .args
        .get(1)
        .map(String::as_str)
        .unwrap_or(DEFAULT_POSE);
    Ok(ScriptCommand::ShowCharacter {
        id: id.to_string(),
        pose: pose.to_string(),
    })
}

/// `hide <id>`
fn cmd_hide(invocation: &Invocation) -> Result<ScriptCommand, CommandError> {
    check_arity(invocation, "hide", 1)?;
    let id = required_arg(invocation, "hide", 0, "id")?;
    Ok(ScriptCommand::HideCharacter { id: id.to_string() })
}

/// `say <speaker> <name> <text>` 或 `say <name> <text>`
///
/// 两参数形式下说话者标识与显示名相同。
fn cmd_say(invocation: &Invocation) -> Result<ScriptCommand, CommandError> {
    check_arity(invocation, "say", 3)?;
    match invocation.args.len() {
        2 => {
            let name = &invocation.args[0];
            let text = &invocation.args[1];
            Ok(ScriptCommand::Say {
                speaker: name.clone(),
                display_name: name.clone(),
                text: text.clone(),
            })
        }
        3 => Ok(ScriptCommand::Say {
            speaker: invocation.args[0].clone(),
            display_name: invocation.args[1].clone(),
            text: invocation.args[2].clone(),
        }),
        _ => Err(CommandError::MissingArgument {
            command: "say",
            argument: "text",
        }),
    }
}

/// `narrate <text>`，归一化为旁白形式的 `Say`
fn cmd_narrate(invocation: &Invocation) -> Result<ScriptCommand, CommandError> {
    check_arity(invocation, "narrate", 1)?;
    let text = required_arg(invocation, "narrate", 0, "text")?;
    Ok(ScriptCommand::Say {
        speaker: String::new(),
        display_name: NARRATOR_NAME.to_string(),
        text: text.to_string(),
    })
}
