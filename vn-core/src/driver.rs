//! # Driver 模块
//!
//! 脚本执行驱动：维护执行位置，按泵式推进逐条产出指令。
//!
//! ## 执行模型
//!
//! 每次 [`pump`](ScriptDriver::pump) 从当前位置顺序转换指令，
//! 直到产出一条阻塞指令（`say` / `narrate`）或脚本结束为止。
//! 非法指令不中止执行：记入 `skipped` 列表后跳过，由宿主记录日志。

use serde::{Deserialize, Serialize};

use crate::command::{CommandTable, ScriptCommand};
use crate::error::CommandError;
use crate::script::Script;

/// 一次泵式推进的结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PumpResult {
    /// 按顺序产出的指令，至多以一条阻塞指令结尾
    pub commands: Vec<ScriptCommand>,
    /// 被跳过的非法指令（行号 + 错误）
    pub skipped: Vec<(usize, CommandError)>,
}

impl PumpResult {
    /// 本次推进是否停在阻塞指令上
    pub fn blocked(&self) -> bool {
        self.commands.last().is_some_and(ScriptCommand::is_blocking)
    }
}

/// 脚本执行驱动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDriver {
    /// 正在执行的脚本
    script: Script,
    /// 下一条待执行指令的下标
    index: usize,
    /// 指令分发表
    #[serde(skip, default)]
    table: CommandTable,
    /// 是否已执行到脚本末尾
    finished: bool,
}

impl ScriptDriver {
    /// 为脚本创建驱动，执行位置指向开头
    pub fn new(script: Script) -> Self {
        let finished = script.is_empty();
        Self {
            script,
            index: 0,
            table: CommandTable::new(),
            finished,
        }
    }

    /// 推进执行，直到阻塞或脚本结束
    pub fn pump(&mut self) -> PumpResult {
        let mut result = PumpResult::default();

        while self.index < self.script.invocations.len() {
            let invocation = &self.script.invocations[self.index];
            self.index += 1;

            match self.table.resolve(invocation) {
                Ok(command) => {
                    let blocking = command.is_blocking();
                    result.commands.push(command);
                    if blocking {
                        break;
                    }
                }
                Err(err) => {
                    result.skipped.push((invocation.line, err));
                }
            }
        }

        if self.index >= self.script.invocations.len() {
            self.finished = true;
        }
        result
    }

    /// 是否已执行到脚本末尾
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 回到脚本开头
    pub fn reset(&mut self) {
        self.index = 0;
        self.finished = self.script.is_empty();
    }

    /// 正在执行的脚本
    pub fn script(&self) -> &Script {
        &self.script
    }
}
