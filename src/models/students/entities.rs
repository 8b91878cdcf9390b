use serde::Serialize;
use ts_rs::TS;

// 学生档案上挂载的文件
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct AttachedFile {
    /// 上传目录中的存储名
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub stored_name: String,
    /// 原始文件名（已清洗）
    pub file_name: String,
}

// 学生档案
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub skills: Option<String>,
    pub profile_picture: Option<AttachedFile>,
    pub resume: Option<AttachedFile>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn attachment(&self, kind: StudentFileKind) -> Option<&AttachedFile> {
        match kind {
            StudentFileKind::Profile => self.profile_picture.as_ref(),
            StudentFileKind::Resume => self.resume.as_ref(),
        }
    }

    /// 所有附件的存储名
    pub fn stored_files(&self) -> Vec<&str> {
        [&self.profile_picture, &self.resume]
            .into_iter()
            .flatten()
            .map(|f| f.stored_name.as_str())
            .collect()
    }
}

// 学生附件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentFileKind {
    Profile, // 头像
    Resume,  // 简历
}

impl StudentFileKind {
    /// multipart 表单中的字段名
    pub fn form_field(&self) -> &'static str {
        match self {
            StudentFileKind::Profile => "profile_picture",
            StudentFileKind::Resume => "resume",
        }
    }
}

impl std::str::FromStr for StudentFileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" | "profile_picture" => Ok(StudentFileKind::Profile),
            "resume" => Ok(StudentFileKind::Resume),
            _ => Err(format!("Invalid file kind: '{s}'. Supported kinds: profile, resume")),
        }
    }
}
