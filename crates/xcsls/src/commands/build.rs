use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use walkdir::WalkDir;
use xcsls_compiler::transform_source;
use xcsls_markup::GeneratorConfig;
use xcsls_workspace::paths;
use xcsls_workspace::write_derived;

/// One-shot compile: transform every source file under the workspace and
/// persist its derived counterpart. A file that fails to read or write
/// is reported and skipped; the rest of the build continues.
pub fn run(root: &Utf8Path, settings: &xcsls_conf::Settings) -> Result<usize> {
    let generator = GeneratorConfig {
        factory: settings.factory.clone(),
        method: settings.method.clone(),
        indent_width: settings.indent_width,
    };

    let mut compiled = 0usize;
    for source_path in collect_sources(root) {
        match compile_one(root, &source_path, &generator) {
            Ok(target) => {
                tracing::info!(%source_path, %target, "compiled");
                compiled += 1;
            }
            Err(err) => {
                tracing::error!(%source_path, %err, "failed to compile; skipping");
            }
        }
    }
    Ok(compiled)
}

fn collect_sources(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut sources: Vec<Utf8PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.file_name().to_str() != Some(paths::GENERATED_DIR))
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .filter(|path| paths::is_source_path(path))
        .collect();
    sources.sort();
    sources
}

fn compile_one(
    root: &Utf8Path,
    source_path: &Utf8Path,
    generator: &GeneratorConfig,
) -> Result<Utf8PathBuf> {
    let source = std::fs::read_to_string(source_path)
        .with_context(|| format!("reading {source_path}"))?;
    let (content, _maps) = transform_source(&source, generator);

    let target = paths::derived_path(root, source_path)
        .with_context(|| format!("{source_path} is outside the workspace root"))?;
    write_derived(&target, &content).with_context(|| format!("writing {target}"))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_build_compiles_workspace() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        fs::create_dir_all(root.join("pages").as_std_path()).unwrap();
        fs::write(
            root.join("pages").join("Home.xcs").as_std_path(),
            "var e = (<div/>);",
        )
        .unwrap();
        fs::write(root.join("Program.cs").as_std_path(), "class P {}").unwrap();

        let compiled = run(&root, &xcsls_conf::Settings::default()).unwrap();
        assert_eq!(compiled, 1);

        let derived = root.join("Generated").join("pages").join("Home.cs");
        let content = fs::read_to_string(derived.as_std_path()).unwrap();
        assert!(content.contains("Document.CreateElement"));
    }

    #[test]
    fn test_build_skips_generated_dir() {
        let dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        fs::create_dir_all(root.join("Generated").as_std_path()).unwrap();
        fs::write(
            root.join("Generated").join("Stale.xcs").as_std_path(),
            "var e = (<div/>);",
        )
        .unwrap();

        let compiled = run(&root, &xcsls_conf::Settings::default()).unwrap();
        assert_eq!(compiled, 0);
    }
}
