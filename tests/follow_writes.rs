use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        if let Ok(read_dir) = fs::read_dir(&dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                    files.push(path);
                }
            }
        }
    }
    files
}

fn file_contains(path: &Path, needle: &str) -> bool {
    fs::read_to_string(path)
        .map(|c| c.contains(needle))
        .unwrap_or(false)
}

#[test]
fn follow_row_writes_only_go_through_the_follow_repository() {
    // The idempotency of follow/unfollow rests on the single conflict-aware
    // insert and the single delete in the follow repository; a second write
    // site would reopen the race the unique constraint closes.
    let src = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");

    let allowed = ["src/db/follow_repo.rs"];

    let mut offenders = Vec::new();
    for file in collect_rs_files(&src) {
        let path_str = file.to_string_lossy().replace('\\', "/");
        if allowed.iter().any(|a| path_str.ends_with(a)) {
            continue;
        }
        if file_contains(&file, "INSERT INTO follows") || file_contains(&file, "DELETE FROM follows")
        {
            offenders.push(path_str.to_string());
        }
    }

    if !offenders.is_empty() {
        panic!(
            "Follow rows must be written through db::follow_repo only. Offenders: {:?}",
            offenders
        );
    }
}
