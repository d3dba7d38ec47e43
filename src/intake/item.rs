/// Shared data structures for accepted uploads
///
/// These are the values the intake surface hands to the enclosing form.
/// Both are immutable snapshots: every change produces a new value.
use serde::Serialize;

use super::data_uri;

/// One accepted, encoded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadItem {
    /// Original filename (e.g., "IMG_0001.jpg")
    name: String,
    /// MIME type as detected at intake
    #[serde(rename = "type")]
    mime_type: String,
    /// Full content as a base64 data URI
    #[serde(rename = "data")]
    encoded_data: String,
    /// Same as `encoded_data` for images, absent otherwise
    #[serde(rename = "preview", skip_serializing_if = "Option::is_none")]
    preview_data: Option<String>,
}

impl UploadItem {
    /// Encode file content into an item
    ///
    /// This is the only constructor, so the preview invariant always holds.
    pub fn encode(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let mime_type = mime_type.into();
        let encoded_data = data_uri::encode(&mime_type, bytes);
        let preview_data = is_image(&mime_type).then(|| encoded_data.clone());

        Self {
            name: name.into(),
            mime_type,
            encoded_data,
            preview_data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn encoded_data(&self) -> &str {
        &self.encoded_data
    }

    pub fn preview_data(&self) -> Option<&str> {
        self.preview_data.as_deref()
    }
}

fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Ordered list of accepted uploads for one field
///
/// Order is acceptance order. The length bound lives with the caller's
/// `IntakeLimits`; this type only provides the snapshot operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UploadSet {
    items: Vec<UploadItem>,
}

impl UploadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadItem> {
        self.items.iter()
    }

    /// New snapshot with `new_items` after the existing ones
    pub fn appended(&self, new_items: impl IntoIterator<Item = UploadItem>) -> Self {
        let mut items = self.items.clone();
        items.extend(new_items);
        Self { items }
    }

    /// New snapshot without the item at `index`
    ///
    /// Out-of-range indexes return an identical snapshot.
    pub fn remove_at(&self, index: usize) -> Self {
        let items = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item.clone())
            .collect();
        Self { items }
    }

    /// Serialize for the enclosing form's submission payload
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl FromIterator<UploadItem> for UploadSet {
    fn from_iter<I: IntoIterator<Item = UploadItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UploadSet {
    type Item = &'a UploadItem;
    type IntoIter = std::slice::Iter<'a, UploadItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
