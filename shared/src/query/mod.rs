//! 列表查询引擎
//!
//! Dashboard 列表页的过滤与排序逻辑：
//! - [`criteria`] - 过滤条件类型 ("all" 哨兵在构造时归一化为 None)
//! - [`filter`] - 纯过滤函数，逐实体一个，AND 组合
//! - [`sort`] - 封闭的类型化排序列集合，未知列显式报错
//!
//! 所有函数不修改输入，总是返回新的 Vec。

pub mod criteria;
pub mod filter;
pub mod sort;

pub use criteria::*;
pub use filter::*;
pub use sort::*;
