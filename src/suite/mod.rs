//! # 套件编排层
//!
//! 负责整个测试套件的生命周期：套件前后的环境准备与清理，以及每个测试用例的前置与后置处理。
//!
//! ## 主要功能
//! - **套件前置**: 清理上一次的报告文件，按需启动本地自动化端点服务
//! - **用例执行**: 加载设备描述、配置并获取会话、启动应用、开启报告句柄，执行用例主体
//! - **用例后置**: 无论成败都会关闭应用并释放会话，单个用例失败不会中断整个套件
//! - **套件后置**: 生成报告、停止端点服务、关闭本地设备
//! - **并行执行**: 开启 `parallel` 时每个用例运行在独立线程上
//!
//! ## 模块结构
//! - `harness`: 套件与用例编排
//! - `service`: 本地端点服务进程
//! - `device`: 模拟器与仿真器启动脚本

pub mod harness;
pub mod service;
pub mod device;


pub use harness::{CaseOutcome, Suite};
pub use service::{EndpointService, SERVICE_LOG};
pub use device::DeviceLauncher;
