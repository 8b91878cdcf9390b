use super::entities::MaterialCategory;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 资料列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct MaterialListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub category: Option<MaterialCategory>,
    pub search: Option<String>,
}

// 资料列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct MaterialListQuery {
    pub page: u64,
    pub size: u64,
    pub category: Option<MaterialCategory>,
    pub search: Option<String>,
}

impl From<MaterialListParams> for MaterialListQuery {
    fn from(params: MaterialListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            category: params.category,
            search: params.search,
        }
    }
}

// 新建资料记录（文件已落盘）
#[derive(Debug, Clone)]
pub struct CreateMaterialRequest {
    pub title: String,
    pub category: MaterialCategory,
    pub description: Option<String>,
    pub stored_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub uploaded_by: Option<i64>,
}

// 资料更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct UpdateMaterialRequest {
    pub title: Option<String>,
    pub category: Option<MaterialCategory>,
    pub description: Option<String>,
}
