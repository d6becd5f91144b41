//! # 路径工具函数
//!
//! 获取应用自身配置目录路径（`~/.mo/LinguaLens/`）。

use std::path::{Path, PathBuf};

/// 配置目录相对主目录的位置
const CONFIG_SUBDIR: [&str; 2] = [".mo", "LinguaLens"];

/// 获取应用配置目录的绝对路径
///
/// 使用 `dirs` crate 获取跨平台的主目录路径。
///
/// # 返回值
/// 返回 `~/.mo/LinguaLens/` 目录的绝对路径。
///
/// # 错误
/// 如果无法确定用户主目录（极端情况，如无 HOME 环境变量），返回错误信息。
///
/// # 示例
/// - Windows: `C:\Users\username\.mo\LinguaLens`
/// - Linux/macOS: `/home/username/.mo/LinguaLens`
pub fn get_config_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "无法获取用户主目录".to_string())?;
    Ok(config_dir_under(&home))
}

/// 以给定目录作为主目录拼接配置目录
pub fn config_dir_under(home: &Path) -> PathBuf {
    CONFIG_SUBDIR.iter().fold(home.to_path_buf(), |acc, part| acc.join(part))
}
