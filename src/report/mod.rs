//! # 报告层
//!
//! 记录每个测试线程的执行步骤与结果，并在关键步骤附加设备截图，套件结束时生成报告文件。
//!
//! ## 主要功能
//! - **线程级报告句柄**: 每个测试线程至多持有一个活动的报告句柄
//! - **步骤记录**: 记录 pass / fail / info 事件，同时输出到日志
//! - **截图附件**: 在通过或失败的步骤后截图并保存到报告目录
//! - **报告生成**: 套件结束时封存全部句柄并写出 `report.json`
//!
//! ## 模块结构
//! - `types`: 报告事件与状态类型
//! - `handle`: 单个测试的报告句柄
//! - `reporter`: 报告器实现与报告接收端 trait

pub mod types;
pub mod handle;
pub mod reporter;


pub use types::{ReportEvent, Status, TestRecord, SuiteReport};
pub use handle::ReportHandle;
pub use reporter::{Reporter, ReportSink, ScreenshotSource, REPORT_FILE};
