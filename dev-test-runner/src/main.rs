//! Golden-file runner: converts every document under `samples/` and diffs the
//! result against the `.ts` file of the same stem.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use oas_ts::{Options, SourceFormat};

fn samples_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("samples")
}

fn is_document(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

fn check(document: &Path) -> Result<bool> {
    let expected_path = document.with_extension("ts");
    let expected = std::fs::read_to_string(&expected_path)
        .with_context(|| format!("missing golden file {}", expected_path.display()))?;
    let source = std::fs::read_to_string(document)?;
    let actual = oas_ts::convert(&source, SourceFormat::from_path(document), &Options::default())?;
    if actual == expected {
        return Ok(true);
    }
    for (i, (a, e)) in actual.lines().zip(expected.lines()).enumerate() {
        if a != e {
            eprintln!("   line {}: expected `{e}`, got `{a}`", i + 1);
            break;
        }
    }
    if actual.lines().count() != expected.lines().count() {
        eprintln!(
            "   {} lines generated, {} expected",
            actual.lines().count(),
            expected.lines().count()
        );
    }
    Ok(false)
}

fn main() -> Result<()> {
    let mut documents = std::fs::read_dir(samples_dir())
        .context("failed to list samples")?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_document(p))
        .collect::<Vec<_>>();
    documents.sort();

    let mut failed = 0usize;
    for document in &documents {
        let name = document.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        match check(document) {
            Ok(true) => eprintln!("✅ {}", name.green()),
            Ok(false) => {
                failed += 1;
                eprintln!("❌ {}", name.red());
            }
            Err(error) => {
                failed += 1;
                eprintln!("❌ {}: {error:#}", name.red());
            }
        }
    }

    eprintln!("{} of {} samples passed", documents.len() - failed, documents.len());
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
