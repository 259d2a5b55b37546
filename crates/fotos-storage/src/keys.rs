//! Storage key resolution for photos and thumbnails.
//!
//! Key format: `[<collection_root>/]<collection>/<id>.jpg` once a photo has an
//! id, `[<collection_root>/]<collection>/temp_<token>.jpg` before that.

use std::fmt;

const TEMP_PREFIX: &str = "temp_";
const EXTENSION: &str = "jpg";

/// Logical namespace a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Photos,
    Thumbnails,
}

impl Collection {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Collection::Photos => "photos",
            Collection::Thumbnails => "thumbnails",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    collection_root: String,
}

impl PathResolver {
    pub fn new(collection_root: impl Into<String>) -> Self {
        let root: String = collection_root.into();
        Self {
            collection_root: root.trim_matches('/').to_string(),
        }
    }

    /// Relative path for a file in `collection`.
    ///
    /// With an id the result is stable; without one every call yields a new
    /// temporary name.
    pub fn resolve(&self, collection: Collection, id: Option<i64>) -> String {
        let filename = match id {
            Some(id) => format!("{}.{}", id, EXTENSION),
            None => format!("{}{}.{}", TEMP_PREFIX, temp_token(), EXTENSION),
        };
        if self.collection_root.is_empty() {
            format!("{}/{}", collection.dir_name(), filename)
        } else {
            format!("{}/{}/{}", self.collection_root, collection.dir_name(), filename)
        }
    }
}

/// 128 random bits as 32 lowercase hex digits
fn temp_token() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Join the media base URL and a relative path with exactly one `/`
pub fn public_url(media_base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        media_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_id() {
        let resolver = PathResolver::default();
        assert_eq!(resolver.resolve(Collection::Photos, Some(12)), "photos/12.jpg");
        assert_eq!(
            resolver.resolve(Collection::Thumbnails, Some(12)),
            "thumbnails/12.jpg"
        );
        assert_eq!(
            resolver.resolve(Collection::Photos, Some(12)),
            resolver.resolve(Collection::Photos, Some(12))
        );
        assert_ne!(
            resolver.resolve(Collection::Photos, Some(1)),
            resolver.resolve(Collection::Photos, Some(2))
        );
    }

    #[test]
    fn test_resolve_temp_names_are_unique() {
        let resolver = PathResolver::default();
        let a = resolver.resolve(Collection::Photos, None);
        let b = resolver.resolve(Collection::Photos, None);
        assert_ne!(a, b);
        assert!(a.starts_with("photos/temp_"));
        assert!(a.ends_with(".jpg"));

        let token = a.trim_start_matches("photos/temp_").trim_end_matches(".jpg");
        assert_eq!(token.len(), 32);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_collection_root_prefix() {
        let resolver = PathResolver::new("/gallery/");
        assert_eq!(
            resolver.resolve(Collection::Photos, Some(3)),
            "gallery/photos/3.jpg"
        );
        assert!(resolver
            .resolve(Collection::Thumbnails, None)
            .starts_with("gallery/thumbnails/temp_"));
    }

    #[test]
    fn test_public_url_single_slash() {
        assert_eq!(public_url("/media", "photos/1.jpg"), "/media/photos/1.jpg");
        assert_eq!(public_url("/media/", "/photos/1.jpg"), "/media/photos/1.jpg");
        assert_eq!(
            public_url("https://cdn.example.com/m/", "thumbnails/1.jpg"),
            "https://cdn.example.com/m/thumbnails/1.jpg"
        );
    }
}
