use super::SeaOrmStorage;
use crate::entity::materials::{ActiveModel, Column, Entity as Materials};
use crate::errors::{AnanasError, Result};
use crate::models::{
    PaginationInfo,
    common::clamp_page,
    materials::{
        entities::{Material, MaterialCategory},
        requests::{CreateMaterialRequest, MaterialListQuery, UpdateMaterialRequest},
        responses::MaterialListResponse,
    },
};
use crate::utils::contains_literal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建课程资料记录
    pub async fn create_material_impl(&self, req: CreateMaterialRequest) -> Result<Material> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            category: Set(req.category.to_string()),
            description: Set(req.description),
            stored_name: Set(req.stored_name),
            original_name: Set(req.original_name),
            file_size: Set(req.file_size),
            content_type: Set(req.content_type),
            uploaded_by: Set(req.uploaded_by),
            uploaded_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to create material: {e}"))
        })?;

        Ok(result.into_material())
    }

    /// 通过 ID 获取课程资料
    pub async fn get_material_by_id_impl(&self, id: i64) -> Result<Option<Material>> {
        let result = Materials::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                AnanasError::database_operation(format!("Failed to query material: {e}"))
            })?;

        Ok(result.map(|m| m.into_material()))
    }

    /// 分页列出课程资料，最新上传的在前
    pub async fn list_materials_with_pagination_impl(
        &self,
        query: MaterialListQuery,
    ) -> Result<MaterialListResponse> {
        let (page, size) = clamp_page(query.page, query.size);

        let mut select = Materials::find();

        // 类别筛选
        if let Some(category) = query.category {
            select = select.filter(Column::Category.eq(category.to_string()));
        }

        // 搜索标题和描述
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_literal(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(pattern.clone()))
                    .add(Column::Description.like(pattern)),
            );
        }

        select = select
            .order_by_desc(Column::UploadedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to count materials: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to count material pages: {e}"))
        })?;

        let materials = paginator.fetch_page(page - 1).await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to list materials: {e}"))
        })?;

        Ok(MaterialListResponse {
            items: materials.into_iter().map(|m| m.into_material()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 列出某一类别的全部资料
    pub async fn list_materials_by_category_impl(
        &self,
        category: MaterialCategory,
    ) -> Result<Vec<Material>> {
        let materials = Materials::find()
            .filter(Column::Category.eq(category.to_string()))
            .order_by_desc(Column::UploadedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AnanasError::database_operation(format!("Failed to list materials: {e}"))
            })?;

        Ok(materials.into_iter().map(|m| m.into_material()).collect())
    }

    /// 更新课程资料；描述为空串时清空
    pub async fn update_material_impl(
        &self,
        id: i64,
        update: UpdateMaterialRequest,
    ) -> Result<Option<Material>> {
        if self.get_material_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(category) = update.category {
            model.category = Set(category.to_string());
        }

        if let Some(description) = update.description {
            let description = description.trim();
            model.description = Set((!description.is_empty()).then(|| description.to_string()));
        }

        model.update(&self.db).await.map_err(|e| {
            AnanasError::database_operation(format!("Failed to update material: {e}"))
        })?;

        self.get_material_by_id_impl(id).await
    }

    /// 删除课程资料记录
    pub async fn delete_material_impl(&self, id: i64) -> Result<bool> {
        let result = Materials::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                AnanasError::database_operation(format!("Failed to delete material: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}
