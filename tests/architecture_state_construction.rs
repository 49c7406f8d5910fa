use std::fs;
use std::path::{Path, PathBuf};

/// Only these files may mint `State` values outside of tests. Everything else
/// must obtain states from the grid so exact-equality lookups stay sound.
const ALLOWED_STATE_CONSTRUCTORS: &[&str] = &[
    "src/mdp/core/state.rs",
    "src/mdp/grid.rs",
    "src/mdp/kinematics.rs",
    "src/mdp/quantizer.rs",
];

fn collect_rust_files(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rust_files(&path, out);
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) == Some("rs") {
            out.push(path);
        }
    }
}

#[test]
fn state_construction_is_limited_to_core_modules() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let src_root = repo_root.join("src");
    let mut files = Vec::new();
    collect_rust_files(&src_root, &mut files);
    assert!(!files.is_empty(), "no sources found under {}", src_root.display());

    let mut offenders = Vec::new();
    for file in files {
        let rel = file
            .strip_prefix(repo_root)
            .unwrap_or(&file)
            .to_string_lossy()
            .replace('\\', "/");
        if ALLOWED_STATE_CONSTRUCTORS
            .iter()
            .any(|allowed| *allowed == rel)
        {
            continue;
        }

        let content = fs::read_to_string(&file).unwrap_or_default();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            // unit tests may build fixtures freely
            if trimmed.starts_with("#[cfg(test)]") {
                break;
            }
            if trimmed.contains("State::new(") && !trimmed.starts_with("//") {
                offenders.push(format!("{rel}:{}: {}", idx + 1, trimmed));
            }
        }
    }

    assert!(
        offenders.is_empty(),
        "State constructed outside core modules:\n{}",
        offenders.join("\n")
    );
}
