//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`franchises`] - 门店管理接口
//! - [`sessions`] - 餐段管理接口 (GET/POST/PUT/PATCH)
//! - [`guests`] - 客户档案接口
//! - [`staff`] - 员工管理接口
//! - [`offers`] - 优惠活动接口
//! - [`menu_items`] - 菜单管理接口 (含场次关联)
//! - [`rpc`] - collection-exists / offer-analytics
//! - [`sync`] - 资源版本快照

pub mod franchises;
pub mod guests;
pub mod health;
pub mod menu_items;
pub mod offers;
pub mod rpc;
pub mod sessions;
pub mod staff;
pub mod sync;
