//! JSON:API response envelopes

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single JSON:API resource object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
}

/// Absent and `null` decode the same way.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope for a single-resource response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataWrapper<T> {
    pub data: T,
}

/// Envelope for a list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWrapper<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
}

impl<T> ListWrapper<T> {
    /// Absolute URL of the next page, when the API reports one
    pub fn next_link(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.next.as_deref()).filter(|next| !next.is_empty())
    }
}

/// Pagination links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// List metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

/// Cursor information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn list_without_links_has_no_next() {
        let list: ListWrapper<Resource> =
            serde_json::from_value(json!({"data": [{"id": "a", "type": "account"}]})).unwrap();
        assert_eq!(list.data.len(), 1);
        assert!(list.data[0].attributes.is_empty());
        assert_eq!(list.next_link(), None);
    }

    #[test]
    fn empty_next_link_is_ignored() {
        let list: ListWrapper<Resource> = serde_json::from_value(json!({
            "data": [],
            "links": {"next": "", "first": "https://api.myponto.com/accounts"},
            "meta": {"paging": {"limit": 100}}
        }))
        .unwrap();
        assert_eq!(list.next_link(), None);
        assert_eq!(list.meta.and_then(|m| m.paging).and_then(|p| p.limit), Some(100));
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let resource: Resource =
            serde_json::from_value(json!({"id": null, "type": null, "attributes": null})).unwrap();
        assert_eq!(resource, Resource::default());
    }

    #[test]
    fn resource_without_id_decodes() {
        let resource: Resource =
            serde_json::from_value(json!({"type": "synchronization", "attributes": {"a": 1}}))
                .unwrap();
        assert_eq!(resource.id, "");
        assert_eq!(resource.kind, "synchronization");
        assert_eq!(resource.attributes["a"], json!(1));
    }
}
