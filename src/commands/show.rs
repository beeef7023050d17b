//! Show a single document

use anyhow::Result;

use crate::Site;

/// Print one document's header and body
pub fn run(site: &Site, identifier: &str, json: bool) -> Result<()> {
    let doc = site.collection().get_one(identifier)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}", doc.title().unwrap_or(&doc.identifier));
    if let Some(date) = doc.date() {
        println!("{}", date);
    }
    println!("{}", site.config.href_for(&doc.identifier));
    println!();
    for (key, value) in &doc.metadata {
        match value.as_str() {
            Some(s) => println!("  {}: {}", key, s),
            None => println!("  {}: {}", key, value),
        }
    }
    println!();
    println!("{}", doc.body);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NotFound;
    use std::fs;

    #[test]
    fn test_show_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let err = run(&site, "missing", false).unwrap_err();
        let not_found = err.downcast_ref::<NotFound>().unwrap();
        assert_eq!(not_found.identifier, "missing");
    }

    #[test]
    fn test_show_existing() {
        let dir = tempfile::tempdir().unwrap();
        let blogs = dir.path().join("public/blogs");
        fs::create_dir_all(&blogs).unwrap();
        fs::write(blogs.join("moi.mdx"), "---\ntitle: Moi\ntags: [a, b]\n---\nHei").unwrap();

        let site = Site::new(dir.path()).unwrap();
        run(&site, "moi", false).unwrap();
        run(&site, "moi", true).unwrap();
    }
}
