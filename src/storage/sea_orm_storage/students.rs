use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{AnanasError, Result};
use crate::models::{
    PaginationInfo,
    common::clamp_page,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::contains_literal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

// 空白文本存为 NULL
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl SeaOrmStorage {
    /// 创建学生档案
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();
        let (picture_stored, picture_name) = req
            .profile_picture
            .map(|f| (Some(f.stored_name), Some(f.file_name)))
            .unwrap_or_default();
        let (resume_stored, resume_name) = req
            .resume
            .map(|f| (Some(f.stored_name), Some(f.file_name)))
            .unwrap_or_default();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(optional_text(req.description)),
            skills: Set(optional_text(req.skills)),
            profile_picture_stored: Set(picture_stored),
            profile_picture_name: Set(picture_name),
            resume_stored: Set(resume_stored),
            resume_name: Set(resume_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to create student: {e}"))
        })?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生档案
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                AnanasError::database_operation(format!("Failed to query student: {e}"))
            })?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生档案，按姓名排序
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = clamp_page(query.page, query.size);

        let mut select = Students::find();

        // 搜索姓名、简介和技能
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_literal(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(pattern.clone()))
                    .add(Column::Description.like(pattern.clone()))
                    .add(Column::Skills.like(pattern)),
            );
        }

        select = select.order_by_asc(Column::Name).order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to count students: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to count student pages: {e}"))
        })?;

        let students = paginator.fetch_page(page - 1).await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to list students: {e}"))
        })?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新学生档案；未提供的字段保持不变
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(optional_text(Some(description)));
        }

        if let Some(skills) = update.skills {
            model.skills = Set(optional_text(Some(skills)));
        }

        if let Some(picture) = update.profile_picture {
            model.profile_picture_stored = Set(Some(picture.stored_name));
            model.profile_picture_name = Set(Some(picture.file_name));
        }

        if let Some(resume) = update.resume {
            model.resume_stored = Set(Some(resume.stored_name));
            model.resume_name = Set(Some(resume.file_name));
        }

        model.update(&self.db).await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to update student: {e}"))
        })?;

        self.get_student_by_id_impl(id).await
    }

    /// 删除学生档案
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                AnanasError::database_operation(format!("Failed to delete student: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}
