//! Local library command handlers: `list`, `show` and `remove`.

use anyhow::{Context, Result};
use manga_dl_core::{LibraryConfig, LibraryIndex};

pub fn run_list_command(config: &LibraryConfig) -> Result<()> {
    let index = LibraryIndex::new(config)?;
    let series = index
        .list_all()
        .with_context(|| format!("failed to index {}", index.root().display()))?;

    if series.is_empty() {
        println!("No series found under {}.", index.root().display());
        return Ok(());
    }

    for entry in &series {
        println!(
            "{}  ({} chapters, {} pages)",
            entry.display_title(),
            entry.chapter_count(),
            entry.page_count()
        );
    }
    Ok(())
}

pub fn run_show_command(config: &LibraryConfig, name: &str) -> Result<()> {
    let index = LibraryIndex::new(config)?;
    let series = index.load(name)?;

    println!("{}  {}", series.display_title(), series.path.display());
    for volume in series.volumes.values() {
        println!("  Volume {}", volume.key);
        for chapter in volume.chapters.values() {
            match &chapter.title {
                Some(title) if !title.is_empty() => println!(
                    "    Chapter {} - {}  ({} pages)",
                    chapter.key,
                    title,
                    chapter.pages.len()
                ),
                _ => println!("    Chapter {}  ({} pages)", chapter.key, chapter.pages.len()),
            }
        }
    }
    Ok(())
}

pub fn run_remove_command(config: &LibraryConfig, name: &str, confirmed: bool) -> Result<()> {
    let index = LibraryIndex::new(config)?;
    if !confirmed {
        let series = index.load(name)?;
        println!(
            "Would delete {} ({} chapters, {} pages) at {}. Pass --yes to delete.",
            series.display_title(),
            series.chapter_count(),
            series.page_count(),
            series.path.display()
        );
        return Ok(());
    }

    let removed = index
        .remove(name)
        .with_context(|| format!("failed to remove {name:?}"))?;
    println!("Deleted {} ({}).", removed.display_title(), removed.path.display());
    Ok(())
}
