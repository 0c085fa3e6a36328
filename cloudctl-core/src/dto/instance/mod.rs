//! Instance DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default size for instances launched from the console
pub const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";

/// Request to launch new instances from an image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInstancesRequest {
    pub image_id: String,
    pub instance_type: String,
    pub min_count: u32,
    pub max_count: u32,
    pub key_name: Option<String>,
}

impl RunInstancesRequest {
    /// Launch exactly one default-sized instance
    ///
    /// A blank key name is treated as "no key pair".
    pub fn single(image_id: impl Into<String>, key_name: Option<String>) -> Self {
        Self {
            image_id: image_id.into(),
            instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            min_count: 1,
            max_count: 1,
            key_name: key_name.filter(|k| !k.trim().is_empty()),
        }
    }
}

/// Request to attach tags to resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagsRequest {
    pub resources: Vec<String>,
    pub tags: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_launches_one_micro_instance() {
        let req = RunInstancesRequest::single("ami-1234", Some("my-key".to_string()));
        assert_eq!(req.instance_type, "t2.micro");
        assert_eq!((req.min_count, req.max_count), (1, 1));
        assert_eq!(req.key_name.as_deref(), Some("my-key"));
    }

    #[test]
    fn test_single_drops_blank_key_name() {
        let req = RunInstancesRequest::single("ami-1234", Some("   ".to_string()));
        assert!(req.key_name.is_none());
    }
}
