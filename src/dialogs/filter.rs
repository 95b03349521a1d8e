//! Extension filters and their wire encoding.
//!
//! The native plug-in expects `"Name|ext1,ext2;Name2|ext3"`.

/// Name used when a filter has a blank display name.
pub const DEFAULT_FILTER_NAME: &str = "Files";

/// Characters with meaning in the wire format.
const RESERVED: [char; 3] = ['|', ';', ','];

/// A named group of file extensions, stored without leading dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<S: AsRef<str>>(name: impl Into<String>, extensions: &[S]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.as_ref().to_string()).collect(),
        }
    }

    /// Extensions with leading dots removed and empty entries skipped.
    pub fn normalized_extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions
            .iter()
            .map(|ext| ext.strip_prefix('.').unwrap_or(ext))
            .filter(|ext| !ext.is_empty())
    }

    /// Name as sent over the wire: separators become spaces, runs of
    /// whitespace collapse, blank falls back to [`DEFAULT_FILTER_NAME`].
    fn wire_name(&self) -> String {
        let name = self
            .name
            .replace(RESERVED, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            DEFAULT_FILTER_NAME.to_string()
        } else {
            name
        }
    }

    fn wire_extensions(&self) -> Vec<String> {
        self.normalized_extensions()
            .map(|ext| ext.replace(RESERVED, "").trim().to_string())
            .filter(|ext| !ext.is_empty())
            .collect()
    }
}

/// Encode filters for the native backend.
///
/// `|`, `;` and `,` cannot appear inside a name or extension and are
/// removed. Filters left without extensions are omitted. Empty input encodes
/// to an empty string, which the backend reads as "all files".
pub fn encode_filters(filters: &[ExtensionFilter]) -> String {
    filters
        .iter()
        .filter_map(|filter| {
            let extensions = filter.wire_extensions();
            if extensions.is_empty() {
                None
            } else {
                Some(format!("{}|{}", filter.wire_name(), extensions.join(",")))
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Parse an encoded filter string back into filters.
///
/// Groups without a `|` or without extensions are ignored.
pub fn decode_filters(encoded: &str) -> Vec<ExtensionFilter> {
    encoded
        .split(';')
        .filter_map(|group| {
            let (name, extensions) = group.split_once('|')?;
            let extensions: Vec<&str> = extensions
                .split(',')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .collect();
            if extensions.is_empty() {
                return None;
            }
            Some(ExtensionFilter::new(name, &extensions))
        })
        .collect()
}
