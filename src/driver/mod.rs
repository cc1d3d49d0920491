//! # 远程驱动层
//!
//! 通过 W3C WebDriver 协议（含 Appium 扩展命令）与远程自动化端点通信，驱动真机、模拟器或云端设备上的应用。
//!
//! ## 主要功能
//! - **会话创建**: 按能力集（capabilities）在端点上创建会话
//! - **元素查询**: 按定位策略查找元素，空结果不视为错误
//! - **元素交互**: 点击、清空、输入文本、读取可见性与文本
//! - **命令执行**: 发送 `mobile:` 系列手势与应用生命周期命令
//! - **截图功能**: 获取设备屏幕的 PNG 截图
//!
//! ## 模块结构
//! - `traits`: 远程驱动的核心 trait 定义
//! - `types`: W3C 协议相关的数据类型
//! - `client`: 基于阻塞 HTTP 客户端的驱动实现
//! - `mock`: 用于测试的 Mock 实现
//!
//! ## 使用示例
//! ```rust,no_run
//! use swaglabs_e2e::driver::{HttpDriver, RemoteDriver};
//! use swaglabs_e2e::locator::By;
//! use swaglabs_e2e::session::{Platform, SessionConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::new(Platform::Android, "http://127.0.0.1:4723")?;
//! let driver = HttpDriver::connect(&config)?;
//!
//! let buttons = driver.find_elements(&By::accessibility_id("test-LOGIN"))?;
//! println!("Found {} login buttons", buttons.len());
//! driver.close()?;
//! # Ok(())
//! # }
//! ```

pub mod traits;
pub mod types;
pub mod client;
pub mod mock;


pub use traits::{DriverFactory, RemoteDriver};
pub use types::{ElementId, Rect};
pub use client::{endpoint_ready, HttpDriver, HttpDriverFactory};
pub use mock::{Command, MockDriver, MockDriverFactory, MockElement};
