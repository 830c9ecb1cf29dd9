use std::path::{Path, PathBuf};

use crate::{context::Context, image::Image};

/// Text of the files written for one successfully assembled source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub object: String,
    pub entries: Option<String>,
    pub externs: Option<String>,
}

impl Output {
    pub fn render(ctx: &Context) -> Self {
        Output {
            object: object(&ctx.image),
            entries: ctx.has_entries().then(|| entries(ctx)),
            externs: ctx.has_externs().then(|| externs(ctx)),
        }
    }

    /// Files to write, named after `base` (the source path without `.as`).
    pub fn files(&self, base: &Path) -> Vec<(PathBuf, &str)> {
        let mut files = vec![(with_suffix(base, "obj"), self.object.as_str())];
        if let Some(entries) = &self.entries {
            files.push((with_suffix(base, "ent"), entries.as_str()));
        }
        if let Some(externs) = &self.externs {
            files.push((with_suffix(base, "ext"), externs.as_str()));
        }
        files
    }
}

fn with_suffix(base: &Path, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Header with the segment sizes, then one `address<TAB>octal` line per word.
fn object(image: &Image) -> String {
    let header = format!("{}\t\t{}\n", image.code().len(), image.data().len());
    let body: String = image
        .words()
        .map(|(addr, word)| format!("{:04}\t{}\n", addr, word.octal()))
        .collect();
    header + &body
}

fn entries(ctx: &Context) -> String {
    ctx.symbols
        .entries()
        .map(|symbol| format!("{}\t{}\n", symbol.name, symbol.address))
        .collect()
}

fn externs(ctx: &Context) -> String {
    ctx.externs
        .latest_first()
        .map(|event| format!("{}\t{}\n", event.name, event.address))
        .collect()
}
