use std::sync::Arc;

use crate::models::{
    materials::{
        entities::{Material, MaterialCategory},
        requests::{CreateMaterialRequest, MaterialListQuery, UpdateMaterialRequest},
        responses::MaterialListResponse,
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 更新用户密码哈希
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool>;

    /// 学生档案方法
    // 创建学生档案
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    // 通过ID获取学生档案
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 分页列出学生档案
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 更新学生档案，不存在时返回 None
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    // 删除学生档案
    async fn delete_student(&self, id: i64) -> Result<bool>;

    /// 课程资料方法
    // 创建课程资料记录
    async fn create_material(&self, material: CreateMaterialRequest) -> Result<Material>;
    // 通过ID获取课程资料
    async fn get_material_by_id(&self, id: i64) -> Result<Option<Material>>;
    // 分页列出课程资料
    async fn list_materials_with_pagination(
        &self,
        query: MaterialListQuery,
    ) -> Result<MaterialListResponse>;
    // 列出某一类别的全部资料，最新的在前
    async fn list_materials_by_category(&self, category: MaterialCategory)
    -> Result<Vec<Material>>;
    // 更新课程资料，不存在时返回 None
    async fn update_material(
        &self,
        id: i64,
        update: UpdateMaterialRequest,
    ) -> Result<Option<Material>>;
    // 删除课程资料记录
    async fn delete_material(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
