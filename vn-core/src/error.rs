//! # Error 模块
//!
//! 定义 vn-core 中使用的错误类型。
//!
//! ## 恢复策略
//!
//! - [`ParseError`]：脚本文本解析失败。Host 层记录日志并把脚本视为已结束。
//! - [`CommandError`]：单条指令调用非法。Driver 记录日志并跳过该指令，
//!   脚本继续执行，宿主进程不受影响。

use thiserror::Error;

/// 脚本文本解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 字符串字面量未闭合
    #[error("第 {line} 行：字符串未闭合")]
    UnterminatedString { line: usize },

    /// 行内容无法切分为指令
    #[error("第 {line} 行：无效的格式 - {message}")]
    InvalidLine { line: usize, message: String },
}

/// 指令调用错误
///
/// 每个变体都携带指令名，必要时还携带违反约束的参数名，
/// 便于日志定位到具体的脚本调用。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// 未注册的指令名
    #[error("未知指令 '{command}'")]
    Unknown { command: String },

    /// 缺少必需参数
    #[error("指令 '{command}' 缺少参数 '{argument}'")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// 参数数量超出指令签名
    #[error("指令 '{command}' 参数过多：期望至多 {max} 个，实际 {actual} 个")]
    TooManyArguments {
        command: &'static str,
        max: usize,
        actual: usize,
    },

    /// 参数值非法
    #[error("指令 '{command}' 参数 '{argument}' 的值无效 - {message}")]
    InvalidArgument {
        command: &'static str,
        argument: &'static str,
        message: String,
    },
}

/// vn-core 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VnError {
    /// 脚本解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),

    /// 指令调用错误
    #[error("指令错误: {0}")]
    Command(#[from] CommandError),
}

/// Result 类型别名
pub type VnResult<T> = Result<T, VnError>;
