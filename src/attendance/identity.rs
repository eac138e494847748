//! 已注册人员特征库 (Enrolled identities)
//!
//! 支持两种格式:
//! - 平行数组: `{ "names": ["alice", ...], "encodings": [[0.1, ...], ...] }`
//! - 映射:     `{ "alice": [0.1, ...], ... }` (按文件中的顺序注册)

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::detection::Embedding;
use crate::error::{Result, SentinelError};

/// 已注册人员集合, 会话内只读
#[derive(Debug, Clone, Default)]
pub struct IdentitySet {
    names: Vec<String>,
    embeddings: Vec<Embedding>,
}

impl IdentitySet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 按注册顺序构建, 检查姓名唯一与维度一致
    pub fn new(entries: Vec<(String, Embedding)>) -> std::result::Result<Self, String> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(entries.len());
        let mut embeddings = Vec::with_capacity(entries.len());

        for (name, embedding) in entries {
            if !seen.insert(name.clone()) {
                return Err(format!("重复的人员姓名: {}", name));
            }
            if embedding.is_empty() {
                return Err(format!("{} 的特征向量为空", name));
            }
            if let Some(first) = embeddings.first().map(Embedding::len) {
                if embedding.len() != first {
                    return Err(format!(
                        "{} 的特征维度为 {}, 应为 {}",
                        name,
                        embedding.len(),
                        first
                    ));
                }
            }
            names.push(name);
            embeddings.push(embedding);
        }

        Ok(Self { names, embeddings })
    }

    /// 从JSON文件加载, 文件不存在时返回空集合
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!(
                "⚠️ 未找到人脸特征库 {}, 请先注册人员, 本次无法考勤",
                path.display()
            );
            return Ok(Self::empty());
        }

        let corrupt = |reason: String| SentinelError::CorruptIdentities {
            path: path.to_path_buf(),
            reason,
        };

        let json = fs::read_to_string(path).map_err(|e| SentinelError::io(path, e))?;
        let value: Value = serde_json::from_str(&json).map_err(|e| corrupt(e.to_string()))?;
        let entries = parse_entries(value).map_err(corrupt)?;
        let identities = Self::new(entries).map_err(corrupt)?;

        log::info!("✅ 已加载 {} 名人员", identities.len());
        Ok(identities)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    /// 特征维度, 空集合时为 None
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Embedding::len)
    }
}

fn parse_entries(value: Value) -> std::result::Result<Vec<(String, Embedding)>, String> {
    let Value::Object(mut map) = value else {
        return Err("顶层必须是JSON对象".to_string());
    };

    if map.contains_key("names") && map.contains_key("encodings") {
        let names: Vec<String> = take_field(&mut map, "names")?;
        let encodings: Vec<Vec<f32>> = take_field(&mut map, "encodings")?;
        if names.len() != encodings.len() {
            return Err(format!(
                "names 与 encodings 数量不一致: {} vs {}",
                names.len(),
                encodings.len()
            ));
        }
        return Ok(names
            .into_iter()
            .zip(encodings.into_iter().map(Embedding::new))
            .collect());
    }

    map.into_iter()
        .map(|(name, vector)| {
            let vector: Vec<f32> = serde_json::from_value(vector)
                .map_err(|e| format!("{} 的特征向量无效: {}", name, e))?;
            Ok((name, Embedding::new(vector)))
        })
        .collect()
}

fn take_field<T: serde::de::DeserializeOwned>(
    map: &mut serde_json::Map<String, Value>,
    key: &str,
) -> std::result::Result<T, String> {
    let value = map.remove(key).unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| format!("字段 {} 无效: {}", key, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
        let path = dir.path().join("face_encodings.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let identities = IdentitySet::load(&dir.path().join("none.json")).unwrap();
        assert!(identities.is_empty());
        assert_eq!(identities.dimension(), None);
    }

    #[test]
    fn test_load_parallel_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"{"names": ["alice", "bob"], "encodings": [[0.1, 0.2], [0.3, 0.4]]}"#,
        );
        let identities = IdentitySet::load(&path).unwrap();
        assert_eq!(identities.names(), ["alice", "bob"]);
        assert_eq!(identities.dimension(), Some(2));
    }

    #[test]
    fn test_load_mapping_keeps_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, r#"{"zoe": [1.0, 0.0], "adam": [0.0, 1.0]}"#);
        let identities = IdentitySet::load(&path).unwrap();
        assert_eq!(identities.name(0), Some("zoe"));
        assert_eq!(identities.name(1), Some("adam"));
    }

    #[test]
    fn test_length_mismatch_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, r#"{"names": ["alice", "bob"], "encodings": [[0.1]]}"#);
        let err = IdentitySet::load(&path).unwrap_err();
        assert!(matches!(err, SentinelError::CorruptIdentities { .. }));
    }

    #[test]
    fn test_inconsistent_dimension_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, r#"{"alice": [0.1, 0.2], "bob": [0.3]}"#);
        assert!(IdentitySet::load(&path).is_err());
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "not json");
        let err = IdentitySet::load(&path).unwrap_err();
        assert!(matches!(err, SentinelError::CorruptIdentities { .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let entries = vec![
            ("alice".to_string(), Embedding::new(vec![0.1])),
            ("alice".to_string(), Embedding::new(vec![0.2])),
        ];
        assert!(IdentitySet::new(entries).is_err());
    }
}
