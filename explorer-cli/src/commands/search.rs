use anyhow::{Context, Result, bail};
use client::export;

use super::AppContext;

pub async fn search(context: &AppContext, query: &str) -> Result<()> {
    context.require_session()?;
    let query = query.trim();
    if query.is_empty() {
        bail!("query must not be empty");
    }

    let response = context
        .gateway
        .search(query)
        .await
        .context("search failed")?;

    if response.results.is_empty() {
        println!("No results found");
        return Ok(());
    }
    for (index, entry) in response.results.iter().enumerate() {
        println!("{:>3}. {}", index + 1, entry.display_text());
    }
    Ok(())
}

pub async fn image(context: &AppContext, prompt: &str) -> Result<()> {
    context.require_session()?;
    let prompt = prompt.trim();
    if prompt.is_empty() {
        bail!("prompt must not be empty");
    }

    let image = context
        .gateway
        .generate_image(prompt)
        .await
        .context("image generation failed")?;

    if let Some(id) = image.id {
        println!("id: {id}");
    }
    println!("prompt: {}", image.prompt.as_deref().unwrap_or(prompt));
    println!("url: {}", image.source().unwrap_or(export::MISSING));
    Ok(())
}
