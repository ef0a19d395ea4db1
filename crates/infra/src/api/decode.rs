//! JSON:API response decoding
//!
//! Resources are decoded from their `attributes` object and then given the
//! envelope `id` through [`Identified`].

use ponto_domain::{ApiError, DataWrapper, Identified, ListWrapper, Resource};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: String,
    #[serde(default)]
    detail: String,
}

/// Build an [`ApiError`] from an error response body.
///
/// Uses the first entry of a JSON:API `errors` array; any other body becomes
/// the message verbatim with an empty code.
pub fn parse_api_error(status_code: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => {
            let first = &parsed.errors[0];
            ApiError::new(status_code, first.code.clone(), first.detail.clone())
        }
        _ => ApiError::new(status_code, "", body),
    }
}

fn from_resource<T>(resource: Resource) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Identified,
{
    let mut item: T = serde_json::from_value(Value::Object(resource.attributes))?;
    item.set_id(resource.id);
    Ok(item)
}

/// Decode a `{data: {...}}` envelope
pub fn decode_resource<T>(body: &[u8]) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Identified,
{
    let wrapper: DataWrapper<Resource> = serde_json::from_slice(body)?;
    from_resource(wrapper.data)
}

/// One decoded page of a list response
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Absolute URL of the next page
    pub next: Option<String>,
}

/// Decode a `{data: [...], links, meta}` envelope
pub fn decode_list<T>(body: &[u8]) -> Result<Page<T>, serde_json::Error>
where
    T: DeserializeOwned + Identified,
{
    let wrapper: ListWrapper<Resource> = serde_json::from_slice(body)?;
    let next = wrapper.next_link().map(str::to_string);
    let items = wrapper.data.into_iter().map(from_resource).collect::<Result<Vec<T>, _>>()?;
    Ok(Page { items, next })
}
