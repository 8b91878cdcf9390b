//! 课程资料实体

use sea_orm::entity::prelude::*;

use super::from_unix;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub category: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(unique)]
    pub stored_name: String,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UploadedBy",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    Uploader,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Uploader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_material(self) -> crate::models::materials::entities::Material {
        use crate::models::materials::entities::{Material, MaterialCategory};

        Material {
            id: self.id,
            title: self.title,
            category: self
                .category
                .parse::<MaterialCategory>()
                .unwrap_or(MaterialCategory::Notes),
            description: self.description,
            file_name: self.original_name,
            file_size: self.file_size,
            content_type: self.content_type,
            stored_name: self.stored_name,
            uploaded_by: self.uploaded_by,
            uploaded_at: from_unix(self.uploaded_at),
            updated_at: from_unix(self.updated_at),
        }
    }
}
