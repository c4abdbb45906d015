//! Interactive data-file picker (`rdash --pick`).
//!
//! Stands in for an upload widget: data files under the working directory are
//! listed with their size, and the user answers with a list number, a path or
//! `q`. The prompt runs over any `BufRead`/`Write` pair so it can be driven
//! from tests.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory levels searched below the working directory.
const MAX_DEPTH: usize = 4;

/// Extensions offered by the picker.
const PICKABLE: [&str; 2] = ["xlsx", "csv"];

const SKIPPED_DIRS: [&str; 3] = [".git", "target", "node_modules"];

/// One file offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub bytes: u64,
}

/// What an answer to the prompt means.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    Listed(usize),
    Typed(PathBuf),
    OutOfRange(usize),
    Quit,
    Blank,
}

fn parse_answer(input: &str, listed: usize) -> Answer {
    let input = input.trim();
    if input.is_empty() {
        return Answer::Blank;
    }
    if input.eq_ignore_ascii_case("q") {
        return Answer::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=listed).contains(&n) => Answer::Listed(n - 1),
        Ok(n) => Answer::OutOfRange(n),
        Err(_) => Answer::Typed(PathBuf::from(input)),
    }
}

/// Prompt on stdin/stdout for a data file found under the working directory.
pub fn prompt_for_data_path() -> Result<PathBuf, AppError> {
    let candidates = discover_data_files();
    let stdin = io::stdin();
    prompt(&candidates, &mut stdin.lock(), &mut io::stdout())
}

fn prompt(candidates: &[Candidate], input: &mut impl BufRead, out: &mut impl Write) -> Result<PathBuf, AppError> {
    let io_err = |e: io::Error| AppError::new(2, format!("Picker I/O failed: {e}"));

    if candidates.is_empty() {
        writeln!(out, "No .xlsx or .csv file under the working directory; type a path or q.").map_err(io_err)?;
    } else {
        writeln!(out, "Data files:").map_err(io_err)?;
        for (i, c) in candidates.iter().enumerate() {
            writeln!(out, "  [{}] {} ({})", i + 1, display_path(&c.path), human_size(c.bytes)).map_err(io_err)?;
        }
    }

    let mut line = String::new();
    loop {
        write!(out, "file> ").map_err(io_err)?;
        out.flush().map_err(io_err)?;

        line.clear();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(AppError::new(2, "No file chosen (end of input)."));
        }

        let path = match parse_answer(&line, candidates.len()) {
            Answer::Quit => return Err(AppError::new(2, "No file chosen.")),
            Answer::Blank => continue,
            Answer::OutOfRange(n) => {
                writeln!(out, "No entry {n}; the list has {} file(s).", candidates.len()).map_err(io_err)?;
                continue;
            }
            Answer::Listed(i) => candidates[i].path.clone(),
            Answer::Typed(path) => path,
        };

        match validate_data_path(&path) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(out, "{err}").map_err(io_err)?,
        }
    }
}

/// Accept only an existing regular file with a pickable extension.
pub fn validate_data_path(path: &Path) -> Result<PathBuf, AppError> {
    let meta = fs::metadata(path)
        .map_err(|_| AppError::new(2, format!("Data file not found: {}", path.display())))?;
    if !meta.is_file() {
        return Err(AppError::new(2, format!("Not a file: {}", path.display())));
    }
    if !is_pickable(path) {
        return Err(AppError::new(
            2,
            format!("Unsupported data file {} (use .xlsx or .csv).", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

fn is_pickable(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    // `~$base.xlsx` is an office lock file, not a workbook.
    !name.starts_with("~$")
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| PICKABLE.iter().any(|p| e.eq_ignore_ascii_case(p)))
}

/// Data files under the working directory, sorted by path.
pub fn discover_data_files() -> Vec<Candidate> {
    walk(Path::new("."), MAX_DEPTH)
}

fn walk(root: &Path, max_depth: usize) -> Vec<Candidate> {
    let mut found = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            if meta.is_dir() {
                let skipped = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| SKIPPED_DIRS.contains(&n));
                if depth < max_depth && !skipped {
                    pending.push((path, depth + 1));
                }
            } else if meta.is_file() && is_pickable(&path) {
                found.push(Candidate { path, bytes: meta.len() });
            }
        }
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    found
}

fn display_path(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}

fn human_size(bytes: u64) -> String {
    match bytes {
        b if b < 1024 => format!("{b} B"),
        b if b < 1024 * 1024 => format!("{:.1} KiB", b as f64 / 1024.0),
        b => format!("{:.1} MiB", b as f64 / (1024.0 * 1024.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(found: &[Candidate]) -> Vec<String> {
        found
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn walk_finds_workbooks_and_csv_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "x").unwrap();
        fs::write(dir.path().join("a.XLSX"), "xyz").unwrap();
        fs::write(dir.path().join("~$a.xlsx"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target").join("c.csv"), "x").unwrap();
        fs::create_dir_all(dir.path().join("d1").join("d2")).unwrap();
        fs::write(dir.path().join("d1").join("d2").join("deep.csv"), "x").unwrap();

        let found = walk(dir.path(), 2);
        assert_eq!(names(&found), vec!["a.XLSX", "b.csv", "deep.csv"]);
        assert_eq!(found[0].bytes, 3);
        assert_eq!(names(&walk(dir.path(), 1)), vec!["a.XLSX", "b.csv"]);
    }

    #[test]
    fn answers() {
        assert_eq!(parse_answer(" 2 \n", 3), Answer::Listed(1));
        assert_eq!(parse_answer("4", 3), Answer::OutOfRange(4));
        assert_eq!(parse_answer("Q", 3), Answer::Quit);
        assert_eq!(parse_answer("  \n", 3), Answer::Blank);
        assert_eq!(parse_answer("data/base.csv", 3), Answer::Typed(PathBuf::from("data/base.csv")));
    }

    #[test]
    fn prompt_retries_until_a_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("base.csv");
        fs::write(&good, "year\n").unwrap();
        let candidates = vec![Candidate { path: good.clone(), bytes: 5 }];

        let mut input = io::Cursor::new(format!("9\n\n{}\n1\n", dir.path().join("missing.csv").display()));
        let mut out = Vec::new();
        let chosen = prompt(&candidates, &mut input, &mut out).unwrap();
        assert_eq!(chosen, good);

        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("[1]"));
        assert!(transcript.contains("No entry 9"));
        assert!(transcript.contains("Data file not found"));
    }

    #[test]
    fn prompt_quit_and_end_of_input_are_input_errors() {
        let mut out = Vec::new();
        let err = prompt(&[], &mut io::Cursor::new("q\n"), &mut out).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = prompt(&[], &mut io::Cursor::new(""), &mut out).unwrap_err();
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_data_path(&dir.path().join("missing.csv")).is_err());
        assert!(validate_data_path(dir.path()).is_err());
        let txt = dir.path().join("a.txt");
        fs::write(&txt, "x").unwrap();
        assert_eq!(validate_data_path(&txt).unwrap_err().exit_code(), 2);
        assert_eq!(human_size(2048), "2.0 KiB");
    }
}
