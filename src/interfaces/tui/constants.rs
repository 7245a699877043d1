//! TUI 常量定义
//!
//! 集中管理所有 UI 相关的常量，避免魔法数字分散在代码各处

use std::time::Duration;

/// URL 显示截断长度（字符数）
pub const URL_TRUNCATE_LENGTH: usize = 50;

/// 无按键时让出运行时的间隔，后台任务在此期间推进
pub const IDLE_TICK: Duration = Duration::from_millis(50);

/// 弹窗尺寸配置
#[derive(Debug, Clone, Copy)]
pub struct PopupSize {
    /// 宽度百分比 (0-100)
    pub width: u16,
    /// 高度百分比 (0-100)
    pub height: u16,
}

impl PopupSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// 各弹窗的尺寸配置
pub mod popup {
    use super::PopupSize;

    /// 新建/编辑表单
    pub const FORM: PopupSize = PopupSize::new(80, 80);
    /// 帮助弹窗
    pub const HELP: PopupSize = PopupSize::new(70, 80);
    /// 删除确认弹窗
    pub const DELETE_CONFIRM: PopupSize = PopupSize::new(60, 35);
}

/// Truncate to `max` chars, marking the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("short", 10), "short");
    }
}
