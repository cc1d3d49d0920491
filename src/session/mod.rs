//! # 会话管理层
//!
//! 管理每个测试线程的远程自动化会话，保证同一线程任一时刻至多持有一个活动会话。
//!
//! ## 主要功能
//! - **会话注册**: 以线程为键维护线程到会话的映射，首次访问时惰性创建
//! - **能力集构建**: 根据全局配置与设备描述生成 Android / iOS / 远程设备实验室的能力集
//! - **平台识别**: 在封闭的平台集合（Android、iOS）上进行校验与分派
//! - **元素查询**: 按当前平台解析定位器并返回元素句柄
//! - **并发安全**: 所有操作都是线程安全的，不同线程之间互不共享会话
//!
//! ## 核心概念
//! - **Session**: 一个远程连接，仅属于创建它的线程
//! - **Element**: 元素引用，用于元素状态读取与交互
//! - **SessionConfig**: 平台、端点地址与能力集
//!
//! ## 模块结构
//! - `platform`: 平台枚举
//! - `capabilities`: 会话配置与能力集构建
//! - `scoped`: 线程作用域的资源映射
//! - `handle`: 会话与元素句柄
//! - `registry`: 会话注册表实现
//!
//! ## 使用示例
//! ```rust,no_run
//! use swaglabs_e2e::locator::{By, Locator};
//! use swaglabs_e2e::session::{Platform, SessionConfig, SessionRegistry};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SessionRegistry::http();
//! registry.configure(SessionConfig::new(Platform::Android, "http://127.0.0.1:4723")?)?;
//!
//! // 同一线程重复获取得到同一会话
//! let session = registry.acquire()?;
//! let login = session.find(&Locator::both("login", By::accessibility_id("test-LOGIN")))?;
//! login.click()?;
//!
//! registry.release();
//! # Ok(())
//! # }
//! ```

pub mod platform;
pub mod capabilities;
pub mod scoped;
pub mod handle;
pub mod registry;


pub use platform::Platform;
pub use capabilities::{SessionConfig, REMOTE_LAB_OPTIONS};
pub use scoped::ThreadScoped;
pub use handle::{Element, Session};
pub use registry::SessionRegistry;
