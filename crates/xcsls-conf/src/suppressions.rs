use camino::Utf8Path;
use rustc_hash::FxHashSet;

/// Error codes the downstream compiler should be silenced on, read from
/// the project configuration file.
///
/// The file is found by walking parent directories until one contains a
/// `.csproj`; the recognized node is `NoWarn`, its text split on `;` and
/// `,`. Entries that start with digits normalize to `CS<digits>`. An
/// unreadable or absent project file yields the empty set.
#[must_use]
pub fn load_suppressions(start: &Utf8Path) -> FxHashSet<String> {
    let Some(project_file) = find_project_file(start) else {
        return FxHashSet::default();
    };
    let content = match std::fs::read_to_string(&project_file) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(%project_file, %err, "could not read project configuration");
            return FxHashSet::default();
        }
    };
    parse_no_warn(&content)
}

fn find_project_file(start: &Utf8Path) -> Option<camino::Utf8PathBuf> {
    let mut dir = if start.is_dir() {
        Some(start)
    } else {
        start.parent()
    };
    while let Some(current) = dir {
        if let Ok(entries) = current.read_dir_utf8() {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension() == Some("csproj") {
                    return Some(path.to_path_buf());
                }
            }
        }
        dir = current.parent();
    }
    None
}

fn parse_no_warn(content: &str) -> FxHashSet<String> {
    let mut codes = FxHashSet::default();
    let mut rest = content;
    while let Some(open) = rest.find("<NoWarn>") {
        let after = &rest[open + "<NoWarn>".len()..];
        let Some(close) = after.find("</NoWarn>") else {
            break;
        };
        for part in after[..close].split([';', ',']) {
            let code = normalize_code(part.trim());
            if !code.is_empty() {
                codes.insert(code);
            }
        }
        rest = &after[close..];
    }
    codes
}

fn normalize_code(code: &str) -> String {
    if code.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("CS{code}")
    } else {
        code.to_string()
    }
}
