//! # 业务逻辑服务模块
//!
//! 包含标注核心的实现，与 Tauri command 层解耦：
//! - `differ` - 词级差异比对（纠错/优化面板高亮）
//! - `aligner` - 中英句子分段对齐
//! - `classifier` - 划词分类：可查询文本 / 单词 / 短语
//! - `context` - 划词上下文窗口提取
//! - `positioner` - 浮动按钮视口内定位
//! - `hide_timer` - 浮动按钮自动隐藏计时器
//! - `floating` - 浮动按钮状态机与划词状态槽
//! - `renderer` - 消息列表渲染（组合根）
//! - `reply` - 模型回复 `正文|||翻译` 解析
//! - `lookup` - 划词查询对话框流程
//! - `lookup_bridge` - 查询请求桥：把查询交给前端执行并等待结果
//! - `conversation` - 会话消息集合
//! - `export` - 会话导出服务：Markdown/JSON 格式导出
//! - `config_store` - 标注配置持久化

pub mod aligner;
pub mod classifier;
pub mod config_store;
pub mod context;
pub mod conversation;
pub mod differ;
pub mod export;
pub mod floating;
pub mod hide_timer;
pub mod lookup;
pub mod lookup_bridge;
pub mod positioner;
pub mod renderer;
pub mod reply;
