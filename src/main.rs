//! # Swag Labs 端到端测试入口
//!
//! 通过 Appium/W3C 远程自动化端点驱动 Swag Labs 移动应用，依次运行全部测试场景并生成报告。
//!
//! ## 主要功能
//! - 加载配置文件与环境变量覆盖
//! - 启动本地端点服务（远程设备实验室模式下跳过）
//! - 运行登录、单商品结算、多商品结算与菜单场景
//! - 生成 `report.json` 报告并附带步骤截图
//!
//! ## 环境变量
//! - `SWAGLABS_CONFIG`: 配置文件路径（默认: Config.toml，不存在时使用默认配置）
//! - `SWAGLABS_HOST` / `SWAGLABS_PORT`: 本地端点地址与端口（默认: 127.0.0.1:4723）
//! - `SWAGLABS_DEVICE_PROFILE`: 设备描述文件名
//! - `SWAGLABS_REMOTE_LAB`: 是否使用远程设备实验室
//! - `RUST_LOG`: 日志过滤规则（默认: info）

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use swaglabs_e2e::{
    config::Config,
    report::{Reporter, ScreenshotSource},
    scenarios,
    session::SessionRegistry,
    suite::Suite,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_CONFIG: &str = "Config.toml";

fn load_config() -> anyhow::Result<Config> {
    let path = std::env::var("SWAGLABS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG));

    let mut config = if path.exists() {
        Config::from_file(&path)?
    } else {
        warn!("{} not found, using default configuration", path.display());
        Config::default()
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing - respect RUST_LOG environment variable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    info!("Swag Labs E2E v{}", swaglabs_e2e::VERSION);

    let config = load_config().context("failed to load configuration")?;
    info!(
        "Configuration loaded: endpoint={}, profile={}, parallel={}",
        config.endpoint_url(),
        config.device.profile,
        config.parallel
    );

    let registry = Arc::new(SessionRegistry::http());
    let camera: Arc<dyn ScreenshotSource> = registry.clone();
    let reporter = Arc::new(Reporter::new(&config.report).with_screenshots(camera));
    let suite = Suite::new(config, registry, reporter);

    suite.before_suite().context("suite setup failed")?;

    let outcomes = suite.run_all(&scenarios::all());

    let report = suite.after_suite().context("suite teardown failed")?;
    info!("Report written to {}", report.display());

    let failed: Vec<_> = outcomes.iter().filter(|o| !o.passed()).collect();
    info!(
        "{} passed, {} failed",
        outcomes.len() - failed.len(),
        failed.len()
    );
    for outcome in &failed {
        error!(
            "FAILED {}: {}",
            outcome.name,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    if !failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
