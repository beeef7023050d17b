//! Create a new post

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::Metadata;
use crate::Site;

const DEFAULT_LEVEL: &str = "A1-A2";
const DEFAULT_CATEGORY: &str = "General";
/// Public path of the collection's image folder
const IMAGE_URL_PREFIX: &str = "/blogs/images";

/// What to put in the header of a new post
#[derive(Debug, Default)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub slug: Option<&'a str>,
    /// `YYYY-MM-DD`, today when absent
    pub date: Option<&'a str>,
    pub description: Option<&'a str>,
    pub tags: &'a [String],
    /// Language level of the post, `A1-A2` when absent
    pub level: Option<&'a str>,
    /// `General` when absent
    pub category: Option<&'a str>,
    /// Header image; only its file name is kept
    pub image: Option<&'a str>,
}

/// Write a scaffolded document into the collection, returning its path
pub fn create_post(site: &Site, post: &NewPost) -> Result<PathBuf> {
    let date = match post.date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", date))?,
        None => chrono::Local::now().date_naive(),
    };

    let slug = slug::slugify(post.slug.unwrap_or(post.title));
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}", post.title);
    }

    let identifier = site
        .config
        .new_post_name
        .replace(":title", &slug)
        .replace(":year", &date.format("%Y").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
        .replace(":i_month", &date.format("%-m").to_string())
        .replace(":i_day", &date.format("%-d").to_string());
    if identifier.contains(['/', '\\']) {
        anyhow::bail!("new_post_name must not contain path separators: {}", identifier);
    }

    let tags = if post.tags.is_empty() {
        site.config.default_tags.as_slice()
    } else {
        post.tags
    };

    let mut header = Metadata::new();
    header.insert("title".into(), post.title.into());
    header.insert("date".into(), date.format("%Y-%m-%d").to_string().into());
    header.insert(
        "description".into(),
        post.description.unwrap_or_default().into(),
    );
    header.insert("slug".into(), slug.into());
    header.insert(
        "level".into(),
        post.level.unwrap_or(DEFAULT_LEVEL).into(),
    );
    header.insert(
        "category".into(),
        post.category.unwrap_or(DEFAULT_CATEGORY).into(),
    );
    header.insert(
        "tags".into(),
        Value::Array(tags.iter().cloned().map(Value::String).collect()),
    );
    header.insert("image".into(), image_url(post.image)?.into());
    header.insert("author".into(), site.config.author.as_str().into());
    header.insert("draft".into(), false.into());

    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&header)?);

    let collection = site.collection();
    fs::create_dir_all(collection.root())?;
    let file_path = collection.path_for(&identifier);

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}

/// `/blogs/images/<file name>` for a given image, empty otherwise
fn image_url(image: Option<&str>) -> Result<String> {
    let Some(image) = image else {
        return Ok(String::new());
    };

    let name = Path::new(image)
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Image path {:?} has no file name", image))?;
    Ok(format!("{}/{}", IMAGE_URL_PREFIX, name))
}

/// Run the new command
pub fn run(site: &Site, post: &NewPost) -> Result<()> {
    let path = create_post(site, post)?;
    println!("Created: {:?}", path);
    Ok(())
}
