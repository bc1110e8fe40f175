// 影视浏览后端库
//
// - models: 目录记录与视图状态
// - services: 视图推导、查询串编解码、地址同步、防抖、缓存与配置
// - api: HTTP 路由

pub mod api;
pub mod models;
pub mod services;
