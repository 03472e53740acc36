use crate::types::{Resolution, SkipReason};

/// Categories served from the generic content route
const GENERIC_CATEGORIES: [&str; 4] = ["master", "sound", "movie", "font"];

/// Category prefix that selects the manifest route
const MANIFEST_PREFIX: &str = "manifest";

/// URL path segment selected by a descriptor's category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointRoute {
    /// Databases, audio, video and fonts
    Generic,
    /// Manifest files
    Manifest,
    /// Everything else
    AssetBundle,
}

impl EndpointRoute {
    /// Route for a category; a `manifest*` category always wins over the table
    pub fn for_category(category: &str) -> Self {
        let route = if GENERIC_CATEGORIES.contains(&category) {
            EndpointRoute::Generic
        } else {
            EndpointRoute::AssetBundle
        };

        if category.starts_with(MANIFEST_PREFIX) {
            return EndpointRoute::Manifest;
        }
        route
    }

    /// Path segment appended to the base URL, always ending in `/`
    pub fn path(self) -> &'static str {
        match self {
            EndpointRoute::Generic => "Generic/",
            EndpointRoute::Manifest => "Manifest/",
            EndpointRoute::AssetBundle => "Windows/assetbundles/",
        }
    }
}

/// Builds download URLs from a base URL, a category and a content hash
#[derive(Clone, Debug)]
pub struct UrlResolver {
    base_url: String,
}

impl UrlResolver {
    /// `base_url` must already end in `/` (see [`Config::validate`](crate::Config::validate))
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// `base_url + route + hash[0..2] + "/" + hash`
    pub fn resolve(&self, hash: &str, category: &str) -> Resolution<String> {
        let Some(shard) = shard(hash) else {
            return Resolution::Skip(SkipReason::HashTooShort {
                hash: hash.to_string(),
            });
        };

        let route = EndpointRoute::for_category(category);
        Resolution::Ready(format!(
            "{}{}{}/{}",
            self.base_url,
            route.path(),
            shard,
            hash
        ))
    }
}

/// First two characters of the hash, or `None` if it is shorter than that.
fn shard(hash: &str) -> Option<&str> {
    let mut chars = hash.char_indices();
    chars.next()?;
    let (second, c) = chars.next()?;
    Some(&hash[..second + c.len_utf8()])
}
