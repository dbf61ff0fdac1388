//! # Script 模块
//!
//! 行式脚本文本的解析。
//!
//! ## 文本格式
//!
//! 每行一条指令：`指令名 参数 "带空格的参数"`
//!
//! - 参数以空白分隔，双引号包裹的参数可含空白
//! - 引号内支持 `\"` 和 `\\` 转义
//! - `#` 开头的行是注释，空行跳过
//!
//! ```text
//! # 开场
//! background forest.png
//! show alice happy
//! say alice Alice "Hello there!"
//! ```

use serde::{Deserialize, Serialize};

use crate::command::Invocation;
use crate::error::ParseError;

/// 解析完成的脚本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// 脚本标识（通常为文件名）
    pub id: String,
    /// 按出现顺序排列的指令调用
    pub invocations: Vec<Invocation>,
}

impl Script {
    /// 从脚本文本解析
    ///
    /// 任一行解析失败时整个脚本解析失败；行号从 1 开始。
    pub fn parse(id: impl Into<String>, source: &str) -> Result<Self, ParseError> {
        let mut invocations = Vec::new();

        for (idx, raw_line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            // 指令名必须是裸 token
            if trimmed.starts_with('"') {
                return Err(ParseError::InvalidLine {
                    line: line_no,
                    message: "指令名不能是字符串字面量".to_string(),
                });
            }

            let tokens = tokenize(trimmed, line_no)?;
            let Some((name, args)) = tokens.split_first() else {
                continue;
            };

            invocations.push(Invocation {
                name: name.clone(),
                args: args.to_vec(),
                line: line_no,
            });
        }

        Ok(Self {
            id: id.into(),
            invocations,
        })
    }

    /// 指令条数
    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    /// 是否没有任何指令
    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }
}

/// 把一行切分为 token 序列
///
/// 状态机扫描：空白分隔普通 token，双引号进入字符串模式。
/// 引号内 `\"` 和 `\\` 还原为字面字符，其余反斜杠按字面保留。
fn tokenize(line: &str, line_no: usize) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut has_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if in_string {
            match c {
                '"' => {
                    in_string = false;
                }
                '\\' => match chars.next() {
                    Some('"') => current.push('"'),
                    Some('\\') => current.push('\\'),
                    Some(other) => {
                        current.push('\\');
                        current.push(other);
                    }
                    None => {
                        return Err(ParseError::UnterminatedString { line: line_no });
                    }
                },
                _ => current.push(c),
            }
        } else {
            match c {
                '"' => {
                    in_string = true;
                    has_token = true;
                }
                c if c.is_whitespace() => {
                    if has_token {
                        tokens.push(std::mem::take(&mut current));
                        has_token = false;
                    }
                }
                _ => {
                    current.push(c);
                    has_token = true;
                }
            }
        }
    }

    if in_string {
        return Err(ParseError::UnterminatedString { line: line_no });
    }
    if has_token {
        tokens.push(current);
    }

    Ok(tokens)
}
