use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 资料分类
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub enum MaterialCategory {
    Notes,    // 课堂笔记
    Exercise, // 练习
    Exam,     // 试卷
}

impl MaterialCategory {
    pub const NOTES: &'static str = "notes";
    pub const EXERCISE: &'static str = "exercise";
    pub const EXAM: &'static str = "exam";

    pub fn all() -> &'static [MaterialCategory] {
        &[
            MaterialCategory::Notes,
            MaterialCategory::Exercise,
            MaterialCategory::Exam,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::Notes => Self::NOTES,
            MaterialCategory::Exercise => Self::EXERCISE,
            MaterialCategory::Exam => Self::EXAM,
        }
    }
}

impl<'de> Deserialize<'de> for MaterialCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MaterialCategory {
    type Err = String;

    // 表单里常见复数写法，一并接受
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notes" | "note" => Ok(MaterialCategory::Notes),
            "exercise" | "exercises" => Ok(MaterialCategory::Exercise),
            "exam" | "exams" => Ok(MaterialCategory::Exam),
            _ => Err(format!(
                "Invalid material category: '{s}'. Supported categories: notes, exercise, exam"
            )),
        }
    }
}

// 课程资料实体
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct Material {
    pub id: i64,
    pub title: String,
    pub category: MaterialCategory,
    pub description: Option<String>,
    /// 上传时的原始文件名（已清洗）
    pub file_name: String,
    pub file_size: i64,
    pub content_type: String,
    /// 上传目录中的存储名
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub stored_name: String,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("notes".parse(), Ok(MaterialCategory::Notes));
        assert_eq!(" Exercises ".parse(), Ok(MaterialCategory::Exercise));
        assert_eq!("EXAM".parse(), Ok(MaterialCategory::Exam));
        assert!("homework".parse::<MaterialCategory>().is_err());
        assert!("".parse::<MaterialCategory>().is_err());
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&MaterialCategory::Exercise).unwrap();
        assert_eq!(json, "\"exercise\"");
        let parsed: MaterialCategory = serde_json::from_str("\"notes\"").unwrap();
        assert_eq!(parsed, MaterialCategory::Notes);
        for category in MaterialCategory::all() {
            assert_eq!(category.as_str().parse::<MaterialCategory>(), Ok(*category));
        }
    }
}
