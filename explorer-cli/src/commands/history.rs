use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use client::export::{self, ExportTable, PREVIEW_CHARS};
use shared::models::{HistoryItem, HistoryKind};

use super::AppContext;

/// History list selector on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryArg {
    Search,
    Image,
}

impl From<HistoryArg> for HistoryKind {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::Search => Self::Search,
            HistoryArg::Image => Self::Image,
        }
    }
}

async fn fetch(context: &AppContext, kind: HistoryKind) -> Result<(Vec<HistoryItem>, ExportTable)> {
    let gateway = &context.gateway;
    match kind {
        HistoryKind::Search => {
            let items = gateway
                .search_history()
                .await
                .context("failed to fetch search history")?
                .search_history;
            let table = export::search_rows(&items);
            Ok((items.into_iter().map(HistoryItem::from).collect(), table))
        }
        HistoryKind::Image => {
            let items = gateway
                .image_history()
                .await
                .context("failed to fetch image history")?
                .image_history;
            let table = export::image_rows(&items);
            Ok((items.into_iter().map(HistoryItem::from).collect(), table))
        }
    }
}

pub async fn list(context: &AppContext, kind: HistoryKind, export_to: Option<&Path>) -> Result<()> {
    context.require_session()?;
    let (items, table) = fetch(context, kind).await?;

    if let Some(path) = export_to {
        let Some(csv) = export::to_csv(&table) else {
            println!("No {kind} history to export");
            return Ok(());
        };
        fs::write(path, csv)
            .with_context(|| format!("failed to write export {}", path.display()))?;
        println!("Exported {} rows to {}", items.len(), path.display());
        return Ok(());
    }

    if items.is_empty() {
        println!("No {kind} history");
        return Ok(());
    }
    for item in &items {
        println!(
            "{:>6}  {}",
            item.id(),
            export::truncate(&item.summary(), PREVIEW_CHARS)
        );
    }
    Ok(())
}

pub async fn delete(context: &AppContext, kind: HistoryKind, id: i64) -> Result<()> {
    context.require_session()?;
    let gateway = &context.gateway;
    let result = match kind {
        HistoryKind::Search => gateway.delete_search(id).await,
        HistoryKind::Image => gateway.delete_image(id).await,
    };
    result.with_context(|| format!("failed to delete {kind} history entry {id}"))?;

    println!("Deleted {kind} history entry {id}");
    Ok(())
}
