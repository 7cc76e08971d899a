//! Interactive picker for saved series files.
//!
//! `yb show` without a path lists the `*.json` exports found under the
//! current directory and lets the user choose one by number or path.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth when looking for saved series.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt on stdin/stdout for a saved series JSON.
pub fn prompt_for_series_path() -> Result<PathBuf, AppError> {
    let files = discover_json_files(Path::new("."));
    let stdin = io::stdin();
    let stdout = io::stdout();
    choose_series_path(&files, &mut stdin.lock(), &mut stdout.lock())
}

/// Selection loop over an explicit file list.
///
/// Accepts a number from the list or a path; `q` cancels. End of input is an error.
pub fn choose_series_path<R: BufRead, W: Write>(
    files: &[PathBuf],
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, AppError> {
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .json files found. Save one with `yb bands <TICKER> --export-json <file.json>`.",
        ));
    }

    let io_err = |e: io::Error| AppError::new(2, format!("Failed to write prompt: {e}"));
    writeln!(output, "Found {} series file(s):", files.len()).map_err(io_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(io_err)?;
    }

    loop {
        write!(output, "Select a file by number (1-{}) or type a path (q to quit): ", files.len())
            .map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::new(2, "No input received. Pass the file with `yb show <file.json>`."));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_series_path(&files[choice - 1]);
            }
            writeln!(output, "Invalid choice: {choice}. Enter a number between 1 and {}.", files.len())
                .map_err(io_err)?;
            continue;
        }

        match validate_series_path(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(output, "{err}").map_err(io_err)?,
        }
    }
}

/// The path must be an existing `.json` file.
pub fn validate_series_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("Series file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_json_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .json file (got: {}).", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// `*.json` files under `root`, sorted by displayed path.
pub fn discover_json_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_json_files(root, 0, DEFAULT_SEARCH_DEPTH, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_json_files(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_json_files(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_json_extension(&path) {
            out.push(path);
        }
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
