use super::entities::AttachedFile;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 学生列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
}

impl From<StudentListParams> for StudentListQuery {
    fn from(params: StudentListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            search: params.search,
        }
    }
}

// 新建学生档案（来自 multipart 表单）
#[derive(Debug, Clone)]
pub struct CreateStudentRequest {
    pub name: String,
    pub description: Option<String>,
    pub skills: Option<String>,
    pub profile_picture: Option<AttachedFile>,
    pub resume: Option<AttachedFile>,
}

// 学生档案更新，None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
    pub profile_picture: Option<AttachedFile>,
    pub resume: Option<AttachedFile>,
}
