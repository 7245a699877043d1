use std::fmt;

use crate::client::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerseError {
    Transport(String),
    Rejected(String),
    MalformedResponse(String),
    Validation(String),
    ControlBusy(String),
    FileOperation(String),
    Serialization(String),
    Config(String),
}

impl TerseError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TerseError::Transport(_) => "T001",
            TerseError::Rejected(_) => "T002",
            TerseError::MalformedResponse(_) => "T003",
            TerseError::Validation(_) => "T004",
            TerseError::ControlBusy(_) => "T005",
            TerseError::FileOperation(_) => "T006",
            TerseError::Serialization(_) => "T007",
            TerseError::Config(_) => "T008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TerseError::Transport(_) => "Network Error",
            TerseError::Rejected(_) => "Request Rejected",
            TerseError::MalformedResponse(_) => "Unexpected Response",
            TerseError::Validation(_) => "Validation Error",
            TerseError::ControlBusy(_) => "Action In Progress",
            TerseError::FileOperation(_) => "File Operation Error",
            TerseError::Serialization(_) => "Serialization Error",
            TerseError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TerseError::Transport(msg) => msg,
            TerseError::Rejected(msg) => msg,
            TerseError::MalformedResponse(msg) => msg,
            TerseError::Validation(msg) => msg,
            TerseError::ControlBusy(msg) => msg,
            TerseError::FileOperation(msg) => msg,
            TerseError::Serialization(msg) => msg,
            TerseError::Config(msg) => msg,
        }
    }

    /// Whether the failure came back from the remote store (any of the three
    /// collaborator failure kinds).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            TerseError::Transport(_) | TerseError::Rejected(_) | TerseError::MalformedResponse(_)
        )
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于通知与 TUI 状态栏）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TerseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TerseError {}

// 便捷的构造函数
impl TerseError {
    pub fn transport<T: Into<String>>(msg: T) -> Self {
        TerseError::Transport(msg.into())
    }

    pub fn rejected<T: Into<String>>(msg: T) -> Self {
        TerseError::Rejected(msg.into())
    }

    pub fn malformed_response<T: Into<String>>(msg: T) -> Self {
        TerseError::MalformedResponse(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        TerseError::Validation(msg.into())
    }

    pub fn control_busy<T: Into<String>>(msg: T) -> Self {
        TerseError::ControlBusy(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TerseError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TerseError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        TerseError::Config(msg.into())
    }
}

impl From<ClientError> for TerseError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport(msg) => TerseError::Transport(msg),
            ClientError::Rejected { status, message } => {
                TerseError::Rejected(format!("HTTP {}: {}", status, message))
            }
            ClientError::Malformed(msg) => TerseError::MalformedResponse(msg),
        }
    }
}

impl From<std::io::Error> for TerseError {
    fn from(err: std::io::Error) -> Self {
        TerseError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TerseError {
    fn from(err: serde_json::Error) -> Self {
        TerseError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TerseError>;
