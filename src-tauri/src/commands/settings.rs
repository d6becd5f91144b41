//! # 配置 Tauri Commands
//!
//! 读写标注配置 `~/.mo/LinguaLens/annotator-config.json`，
//! 读取或保存成功后同步替换渲染器持有的配置。

use tauri::State;

use crate::models::settings::AnnotatorConfig;
use crate::services::config_store;
use crate::services::renderer::MessageRenderer;

/// 读取标注配置
///
/// 配置文件不存在（首次使用）时返回默认配置。
///
/// # 错误
/// 无法确定主目录、文件无法读取或 JSON 解析失败时返回错误
#[tauri::command]
pub async fn read_annotator_config(
    renderer: State<'_, MessageRenderer>,
) -> Result<AnnotatorConfig, String> {
    let file = config_store::default_config_file()?;
    let config = config_store::load_config(&file).await?;
    renderer.set_config(config.clone());
    Ok(config)
}

/// 保存标注配置
///
/// # 错误
/// 序列化、创建目录或写入失败时返回错误
#[tauri::command]
pub async fn save_annotator_config(
    config: AnnotatorConfig,
    renderer: State<'_, MessageRenderer>,
) -> Result<(), String> {
    let file = config_store::default_config_file()?;
    config_store::save_config(&file, &config).await?;
    renderer.set_config(config);
    Ok(())
}
