//! List the collection

use anyhow::Result;

use crate::content::Summary;
use crate::Site;

/// Summaries of every document, newest first
pub fn summaries(site: &Site) -> Vec<Summary> {
    site.collection()
        .list_all()
        .iter()
        .map(|doc| doc.summary(&site.config.route_prefix))
        .collect()
}

/// Print the collection as text or JSON
pub fn run(site: &Site, json: bool) -> Result<()> {
    let cards = summaries(site);

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("No posts found in {:?}", site.collection_dir);
        return Ok(());
    }

    println!("Posts ({}):", cards.len());
    for card in cards {
        let date = if card.date.is_empty() {
            "----------"
        } else {
            card.date.as_str()
        };
        println!(
            "  {} - {} [{}] -> {}",
            date, card.title, card.identifier, card.href
        );
    }

    Ok(())
}
