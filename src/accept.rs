/// Parsing of HTML-style `accept` strings
///
/// `"image/*,application/pdf,.heic"` becomes the extension list the native
/// picker filters on.

/// One comma-separated entry of an accept string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptEntry {
    /// `.pdf`
    Extension(String),
    /// `image/png` or `image/*`
    Mime(String),
}

/// Parsed accept string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptFilter {
    entries: Vec<AcceptEntry>,
}

impl AcceptFilter {
    pub fn parse(accept: &str) -> Self {
        let entries = accept
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.strip_prefix('.') {
                Some(ext) => AcceptEntry::Extension(ext.to_ascii_lowercase()),
                None => AcceptEntry::Mime(entry.to_ascii_lowercase()),
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AcceptEntry] {
        &self.entries
    }

    /// Extensions for the picker filter, deduplicated, in entry order
    ///
    /// Unknown MIME types contribute nothing.
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = Vec::new();
        let mut push = |ext: &str| {
            if !extensions.iter().any(|e| e == ext) {
                extensions.push(ext.to_string());
            }
        };

        for entry in &self.entries {
            match entry {
                AcceptEntry::Extension(ext) => push(ext.as_str()),
                AcceptEntry::Mime(mime) => {
                    for ext in mime_guess::get_mime_extensions_str(mime).unwrap_or_default() {
                        push(*ext);
                    }
                }
            }
        }

        extensions
    }

    /// Short label for the picker filter (e.g. "Images, PDF")
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for entry in &self.entries {
            let part = match entry {
                AcceptEntry::Extension(ext) => ext.to_ascii_uppercase(),
                AcceptEntry::Mime(mime) => match mime.split_once('/') {
                    Some((top, "*")) => format!("{}s", capitalize(top)),
                    Some((_, sub)) => sub.to_ascii_uppercase(),
                    None => mime.clone(),
                },
            };
            if !parts.contains(&part) {
                parts.push(part);
            }
        }
        parts.join(", ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_mixed_entries() {
        let filter = AcceptFilter::parse(" image/* , .HEIC,application/pdf,");
        assert_eq!(
            filter.entries(),
            &[
                AcceptEntry::Mime("image/*".to_string()),
                AcceptEntry::Extension("heic".to_string()),
                AcceptEntry::Mime("application/pdf".to_string()),
            ]
        );
    }

    #[test]
    fn test_extensions_expand_mime_types() {
        let extensions = AcceptFilter::parse("image/*,application/pdf").extensions();
        assert!(extensions.iter().any(|e| e == "png"));
        assert!(extensions.iter().any(|e| e == "jpg"));
        assert!(extensions.iter().any(|e| e == "pdf"));
    }

    #[test]
    fn test_extensions_deduplicate() {
        let extensions = AcceptFilter::parse(".pdf,application/pdf").extensions();
        assert_eq!(extensions.iter().filter(|e| *e == "pdf").count(), 1);
        assert_eq!(extensions[0], "pdf");
    }

    #[test]
    fn test_unknown_mime_contributes_nothing() {
        assert!(AcceptFilter::parse("application/x-nothing-here").extensions().is_empty());
    }

    #[test]
    fn test_empty_accept() {
        assert!(AcceptFilter::parse("").is_empty());
    }

    #[test]
    fn test_label() {
        assert_eq!(AcceptFilter::parse("image/*,application/pdf,.heic").label(), "Images, PDF, HEIC");
    }
}
