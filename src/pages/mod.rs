//! # 页面对象层
//!
//! 为 Swag Labs 应用的每个界面提供页面对象，封装定位器、校验与交互步骤。
//!
//! ## 主要功能
//! - **双平台定位器**: 每个界面元素同时声明 Android 与 iOS 查询
//! - **步骤报告**: 每个页面操作成功时上报 pass，失败时上报原因并向上传播错误
//! - **商品校验**: 购物车与结算概览共用商品名称、价格与合计金额校验
//!
//! ## 核心概念
//! - **PageContext**: 单个测试用例内共享的会话、等待器、动作分派器与报告接收端
//! - **Product / Customer**: 测试数据模型，价格以分为单位保存
//!
//! ## 模块结构
//! - `base`: 页面上下文与通用校验
//! - `model`: 测试数据模型与价格解析
//! - `line_items`: 商品行校验
//! - `login`: 登录界面
//! - `products`: 商品列表界面
//! - `cart`: 购物车界面
//! - `checkout_info`: 结算信息界面
//! - `checkout_overview`: 结算概览界面
//! - `order_confirmation`: 下单完成界面

pub mod base;
pub mod model;
pub mod line_items;
pub mod login;
pub mod products;
pub mod cart;
pub mod checkout_info;
pub mod checkout_overview;
pub mod order_confirmation;

#[cfg(test)]
mod tests;

pub use base::PageContext;
pub use model::{format_price, parse_price, Customer, Product};
pub use login::LoginPage;
pub use products::ProductsPage;
pub use cart::CartPage;
pub use checkout_info::CheckoutInfoPage;
pub use checkout_overview::CheckoutOverviewPage;
pub use order_confirmation::OrderConfirmationPage;
