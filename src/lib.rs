//! Ananas AI Education - 课程资料与学生档案服务
//!
//! 管理员上传课堂笔记、练习与试卷，维护学生档案；访客浏览与下载。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），用于令牌吊销与用户缓存
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、授权、限流与安全响应头
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 启动与关闭流程
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 上传、文件名、JWT、密码等工具

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
