use super::entities::Material;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct MaterialResponse {
    pub material: Material,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct MaterialListResponse {
    pub items: Vec<Material>,
    pub pagination: PaginationInfo,
}

// 首页数据：按分类分组
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct MaterialOverviewResponse {
    pub notes: Vec<Material>,
    pub exercises: Vec<Material>,
    pub exams: Vec<Material>,
}
