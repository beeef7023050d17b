//! Content loader - lists and resolves documents of a collection directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{parse_document, ContentDocument, FrontMatterError};
use crate::Site;

/// Why a single document could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("File name of {path:?} is not a valid identifier")]
    InvalidName { path: PathBuf },
}

/// The only failure a lookup reports, whatever went wrong underneath
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Document not found: {identifier}")]
pub struct NotFound {
    pub identifier: String,
}

/// Outcome of loading one candidate file during a scan
#[derive(Debug)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub result: Result<ContentDocument, DocumentError>,
}

/// A directory of `<identifier>.<extension>` documents.
///
/// Every call reads the directory afresh; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Collection {
    root: PathBuf,
    extension: String,
}

impl Collection {
    /// Create a collection rooted at `root`, recognising files by `extension` (without the dot).
    ///
    /// An empty extension recognises nothing: the collection lists no
    /// documents and every lookup reports [`NotFound`].
    pub fn new<P: Into<PathBuf>>(root: P, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// The collection configured for a site
    pub fn from_site(site: &Site) -> Self {
        Self::new(site.collection_dir.clone(), &site.config.extension)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// All parseable documents, newest first.
    ///
    /// Dates are compared as plain strings. The sort is stable, and documents
    /// without a string `date` come after every dated one. A missing
    /// collection directory yields an empty list; documents that fail to
    /// load are logged and left out.
    pub fn list_all(&self) -> Vec<ContentDocument> {
        let mut documents: Vec<ContentDocument> = self
            .scan()
            .into_iter()
            .filter_map(|entry| match entry.result {
                Ok(document) => Some(document),
                Err(e) => {
                    tracing::warn!("Skipping document: {}", e);
                    None
                }
            })
            .collect();

        sort_newest_first(&mut documents);
        tracing::debug!(
            "Loaded {} documents from {:?}",
            documents.len(),
            self.root
        );

        documents
    }

    /// Resolve one document by identifier.
    ///
    /// Missing files, I/O errors, bad headers and identifiers that cannot
    /// name a file of this collection all report [`NotFound`].
    pub fn get_one(&self, identifier: &str) -> Result<ContentDocument, NotFound> {
        let not_found = || NotFound {
            identifier: identifier.to_string(),
        };

        if self.extension.is_empty() || !is_valid_identifier(identifier) {
            tracing::debug!("Rejected identifier {:?}", identifier);
            return Err(not_found());
        }

        self.load(&self.path_for(identifier)).map_err(|e| {
            tracing::debug!("Lookup of {:?} failed: {}", identifier, e);
            not_found()
        })
    }

    /// Load every candidate file in file-name order, keeping failures.
    pub fn scan(&self) -> Vec<ScanEntry> {
        if !self.root.is_dir() {
            tracing::debug!("Collection directory {:?} does not exist", self.root);
            return Vec::new();
        }

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Failed to read collection entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.is_document(entry.path()))
            .map(|entry| {
                let path = entry.into_path();
                let result = self.load(&path);
                ScanEntry { path, result }
            })
            .collect()
    }

    /// [`Collection::list_all`] on the blocking thread pool
    pub async fn list_all_async(&self) -> Vec<ContentDocument> {
        let collection = self.clone();
        match tokio::task::spawn_blocking(move || collection.list_all()).await {
            Ok(documents) => documents,
            Err(e) => {
                tracing::error!("Listing task for {:?} failed: {}", self.root, e);
                Vec::new()
            }
        }
    }

    /// [`Collection::get_one`] on the blocking thread pool
    pub async fn get_one_async(&self, identifier: &str) -> Result<ContentDocument, NotFound> {
        let collection = self.clone();
        let id = identifier.to_string();
        match tokio::task::spawn_blocking(move || collection.get_one(&id)).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Lookup task for {:?} failed: {}", identifier, e);
                Err(NotFound {
                    identifier: identifier.to_string(),
                })
            }
        }
    }

    /// Where the document for `identifier` lives
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.root.join(format!("{}.{}", identifier, self.extension))
    }

    fn is_document(&self, path: &Path) -> bool {
        !self.extension.is_empty()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == self.extension)
                .unwrap_or(false)
    }

    /// Read and parse a single file
    fn load(&self, path: &Path) -> Result<ContentDocument, DocumentError> {
        let identifier = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| is_valid_identifier(s))
            .ok_or_else(|| DocumentError::InvalidName {
                path: path.to_path_buf(),
            })?
            .to_string();

        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (metadata, body) =
            parse_document(&raw).map_err(|source| DocumentError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(ContentDocument::new(identifier, metadata, body))
    }
}

/// Newest first by raw date string; undated documents last
fn sort_newest_first(documents: &mut [ContentDocument]) {
    documents.sort_by(|a, b| b.date().cmp(&a.date()));
}

/// An identifier must name a direct child of the collection directory
fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
        && identifier != "."
        && identifier != ".."
        && !identifier.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    /// The two-post collection used throughout
    fn fixture() -> (TempDir, Collection) {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "hello-world.mdx",
            "---\ntitle: \"Hello\"\ndate: \"2024-01-01\"\ndescription: \"First post\"\n---\nWelcome.",
        );
        write(
            dir.path(),
            "second-post.mdx",
            "---\ntitle: \"Second\"\ndate: \"2024-06-01\"\ndescription: \"Later post\"\n---\nAgain.",
        );
        let collection = Collection::new(dir.path(), "mdx");
        (dir, collection)
    }

    fn ids(documents: &[ContentDocument]) -> Vec<&str> {
        documents.iter().map(|d| d.identifier.as_str()).collect()
    }

    #[test]
    fn test_list_newest_first() {
        let (_dir, collection) = fixture();
        let posts = collection.list_all();
        assert_eq!(ids(&posts), vec!["second-post", "hello-world"]);
    }

    #[test]
    fn test_get_one() {
        let (_dir, collection) = fixture();
        let post = collection.get_one("hello-world").unwrap();

        let mut expected = crate::content::Metadata::new();
        expected.insert("title".into(), "Hello".into());
        expected.insert("date".into(), "2024-01-01".into());
        expected.insert("description".into(), "First post".into());

        assert_eq!(post.identifier, "hello-world");
        assert_eq!(post.metadata, expected);
        assert_eq!(post.body, "Welcome.");
    }

    #[test]
    fn test_get_one_missing() {
        let (_dir, collection) = fixture();
        assert_eq!(
            collection.get_one("missing"),
            Err(NotFound {
                identifier: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_get_one_matches_listing() {
        let (_dir, collection) = fixture();
        for listed in collection.list_all() {
            let fetched = collection.get_one(&listed.identifier).unwrap();
            assert_eq!(fetched, listed);
        }
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let collection = Collection::new(dir.path().join("nope"), "mdx");
        assert!(collection.list_all().is_empty());
        assert!(collection.scan().is_empty());
        assert!(collection.get_one("anything").is_err());
    }

    #[test]
    fn test_listing_is_repeatable() {
        let (_dir, collection) = fixture();
        assert_eq!(collection.list_all(), collection.list_all());
    }

    #[test]
    fn test_listing_reflects_live_directory() {
        let (dir, collection) = fixture();
        assert_eq!(collection.list_all().len(), 2);

        write(dir.path(), "third.mdx", "---\ndate: \"2025-01-01\"\n---\n");
        assert_eq!(ids(&collection.list_all())[0], "third");

        fs::remove_file(dir.path().join("hello-world.mdx")).unwrap();
        assert_eq!(ids(&collection.list_all()), vec!["third", "second-post"]);
        assert!(collection.get_one("hello-world").is_err());
    }

    #[test]
    fn test_unparseable_document_is_skipped() {
        let (dir, collection) = fixture();
        write(dir.path(), "broken.mdx", "---\ntitle: [oops\n---\nBody");
        write(dir.path(), "garbled.mdx", "---\ntitle: never closed\n\nstray prose");

        let posts = collection.list_all();
        assert_eq!(ids(&posts), vec!["second-post", "hello-world"]);

        let failures: Vec<_> = collection
            .scan()
            .into_iter()
            .filter_map(|entry| entry.result.err())
            .collect();
        assert_eq!(failures.len(), 2);
        assert!(failures
            .iter()
            .all(|e| matches!(e, DocumentError::FrontMatter { .. })));

        assert!(collection.get_one("broken").is_err());
        assert!(collection.get_one("garbled").is_err());
    }

    #[test]
    fn test_unclosed_header_still_lists() {
        let (dir, collection) = fixture();
        write(
            dir.path(),
            "unclosed.mdx",
            "---\ntitle: Never closed\ndate: \"2024-03-01\"\n",
        );

        let posts = collection.list_all();
        assert_eq!(ids(&posts), vec!["second-post", "unclosed", "hello-world"]);

        let post = collection.get_one("unclosed").unwrap();
        assert_eq!(post.title(), Some("Never closed"));
        assert_eq!(post.body, "");
    }

    #[test]
    fn test_non_utf8_document_is_skipped() {
        let (dir, collection) = fixture();
        fs::write(dir.path().join("binary.mdx"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        assert_eq!(collection.list_all().len(), 2);
        let entry = collection
            .scan()
            .into_iter()
            .find(|entry| entry.path.ends_with("binary.mdx"))
            .unwrap();
        assert!(matches!(entry.result, Err(DocumentError::Io { .. })));
        assert!(collection.get_one("binary").is_err());
    }

    #[test]
    fn test_other_files_and_directories_ignored() {
        let (dir, collection) = fixture();
        write(dir.path(), "notes.md", "---\ndate: \"2099-01-01\"\n---\n");
        write(dir.path(), "README", "readme");
        fs::create_dir(dir.path().join("images")).unwrap();
        write(
            &dir.path().join("images"),
            "nested.mdx",
            "---\ndate: \"2099-01-01\"\n---\n",
        );
        fs::create_dir(dir.path().join("folder.mdx")).unwrap();

        assert_eq!(
            ids(&collection.list_all()),
            vec!["second-post", "hello-world"]
        );
        assert!(collection.get_one("notes").is_err());
        assert!(collection.get_one("folder").is_err());
    }

    #[test]
    fn test_undated_documents_sort_last_and_keep_order() {
        let (dir, collection) = fixture();
        write(dir.path(), "a-undated.mdx", "---\ntitle: A\n---\n");
        write(dir.path(), "b-undated.mdx", "No header at all.");
        write(dir.path(), "c-same-day.mdx", "---\ndate: \"2024-06-01\"\n---\n");

        let posts = collection.list_all();
        assert_eq!(
            ids(&posts),
            vec![
                "c-same-day",
                "second-post",
                "hello-world",
                "a-undated",
                "b-undated"
            ]
        );
        for pair in posts.windows(2) {
            assert!(pair[0].date() >= pair[1].date());
        }
    }

    #[test]
    fn test_dates_compare_as_strings() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "nine.mdx", "---\ndate: \"2024-9-01\"\n---\n");
        write(dir.path(), "ten.mdx", "---\ndate: \"2024-10-01\"\n---\n");
        let collection = Collection::new(dir.path(), "mdx");

        // "2024-9" > "2024-1" lexically, even though October is later
        assert_eq!(ids(&collection.list_all()), vec!["nine", "ten"]);
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "post.mdx",
            "---\ntitle: T\ndate: \"2024-01-01\"\nimage: /blogs/images/a.webp\nimage_alt: Lake\nlevel: A1\n---\nBody",
        );
        let collection = Collection::new(dir.path(), ".mdx");

        let post = collection.get_one("post").unwrap();
        assert_eq!(post.image(), Some("/blogs/images/a.webp"));
        assert_eq!(post.image_alt(), Some("Lake"));
        assert_eq!(post.get_str("level"), Some("A1"));
        let keys: Vec<_> = post.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "date", "image", "image_alt", "level"]);
    }

    #[test]
    fn test_path_like_identifiers_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("collection");
        fs::create_dir_all(root.join("sub")).unwrap();
        write(dir.path(), "outside.mdx", "---\ntitle: outside\n---\n");
        write(&root, "inside.mdx", "---\ntitle: inside\n---\n");
        write(&root.join("sub"), "post.mdx", "---\ntitle: nested\n---\n");
        let collection = Collection::new(&root, "mdx");

        for id in ["", ".", "..", "../outside", "sub/post", "..\\outside"] {
            assert!(collection.get_one(id).is_err(), "{:?} should not resolve", id);
        }
        assert!(collection.get_one("inside").is_ok());
    }

    #[test]
    fn test_empty_extension_matches_nothing() {
        let (dir, _) = fixture();
        write(dir.path(), "hello-world.", "---\ntitle: dangling dot\n---\n");
        let collection = Collection::new(dir.path(), "");

        assert!(collection.list_all().is_empty());
        assert!(collection.get_one("hello-world").is_err());
    }

    #[test]
    fn test_identifier_with_dots() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "v1.2-release.mdx", "---\ndate: \"2024-01-01\"\n---\nNotes");
        let collection = Collection::new(dir.path(), "mdx");

        assert_eq!(ids(&collection.list_all()), vec!["v1.2-release"]);
        assert_eq!(collection.get_one("v1.2-release").unwrap().body, "Notes");
    }

    #[tokio::test]
    async fn test_async_variants() {
        let (_dir, collection) = fixture();
        let posts = collection.list_all_async().await;
        assert_eq!(ids(&posts), vec!["second-post", "hello-world"]);
        assert_eq!(
            collection.get_one_async("hello-world").await.unwrap().body,
            "Welcome."
        );
        assert!(collection.get_one_async("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_lookups() {
        let (_dir, collection) = fixture();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let collection = collection.clone();
                tokio::spawn(async move {
                    let id = if i % 2 == 0 { "hello-world" } else { "second-post" };
                    collection.get_one_async(id).await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }
}
