//! # 标注配置持久化
//!
//! 读写 `~/.mo/LinguaLens/annotator-config.json`。
//! 文件不存在（首次使用）时返回默认配置；保存时自动创建父目录，JSON 使用 2 空格缩进。

use std::path::{Path, PathBuf};

use crate::models::settings::AnnotatorConfig;
use crate::utils::path;

/// 配置文件名
const CONFIG_FILE_NAME: &str = "annotator-config.json";

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf, String> {
    Ok(path::get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// 读取标注配置
///
/// # 参数
/// - `file` - 配置文件路径
///
/// # 错误
/// 文件存在但无法读取或 JSON 解析失败时返回错误
pub async fn load_config(file: &Path) -> Result<AnnotatorConfig, String> {
    if !tokio::fs::try_exists(file).await.unwrap_or(false) {
        log::info!("配置文件不存在，使用默认配置: {}", file.display());
        return Ok(AnnotatorConfig::default());
    }

    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| format!("读取配置文件失败: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("解析配置文件失败: {}", e))
}

/// 保存标注配置
///
/// # 错误
/// 序列化、创建目录或写入失败时返回错误
pub async fn save_config(file: &Path, config: &AnnotatorConfig) -> Result<(), String> {
    if let Some(parent) = file.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("创建配置目录失败: {}", e))?;
    }

    let content =
        serde_json::to_string_pretty(config).map_err(|e| format!("序列化配置失败: {}", e))?;

    tokio::fs::write(file, content)
        .await
        .map_err(|e| format!("写入配置文件失败: {}", e))?;
    log::info!("配置已保存: {}", file.display());
    Ok(())
}
