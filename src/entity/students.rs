//! 学生档案实体

use sea_orm::entity::prelude::*;

use super::from_unix;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub skills: Option<String>,
    pub profile_picture_stored: Option<String>,
    pub profile_picture_name: Option<String>,
    pub resume_stored: Option<String>,
    pub resume_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 存储名与原始文件名成对出现，缺一即视为无附件
fn attached(stored: Option<String>, name: Option<String>) -> Option<crate::models::students::entities::AttachedFile> {
    use crate::models::students::entities::AttachedFile;

    match (stored, name) {
        (Some(stored_name), Some(file_name)) => Some(AttachedFile {
            stored_name,
            file_name,
        }),
        _ => None,
    }
}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::Student;

        Student {
            id: self.id,
            name: self.name,
            description: self.description,
            skills: self.skills,
            profile_picture: attached(self.profile_picture_stored, self.profile_picture_name),
            resume: attached(self.resume_stored, self.resume_name),
            created_at: from_unix(self.created_at),
            updated_at: from_unix(self.updated_at),
        }
    }
}
