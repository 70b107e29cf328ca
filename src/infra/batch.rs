use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description};
use tracing::debug;

use crate::infra::{MapError, SolveObserver, load_map};
use crate::search::{SearchLimits, SearchReport, find_path_with_limits};

/// Map file name to its command list. Unsolved maps map to an empty list.
pub type Solutions = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub force_switch_off: bool,
    pub limits: SearchLimits,
}

pub fn solve_map_file(
    path: &Path,
    options: BatchOptions,
    observer: &mut dyn SolveObserver,
) -> Result<SearchReport, MapError> {
    let name = file_name(path);
    let (grid, agents) = load_map(path)?.build()?;
    observer.on_map_loaded(&name, &grid, &agents);

    let report = find_path_with_limits(&agents, &grid, options.force_switch_off, options.limits);
    observer.on_map_searched(&name, &grid, &report);
    Ok(report)
}

/// Solves every `*.json` map in `folder`, or only `only` when given. Maps that
/// fail to load are reported to the observer and left out of the result.
pub fn solve_folder(
    folder: &Path,
    only: Option<&str>,
    options: BatchOptions,
    observer: &mut dyn SolveObserver,
) -> Result<Solutions, MapError> {
    let files = match only {
        Some(name) => {
            let path = folder.join(name);
            if !path.is_file() {
                return Err(MapError::Io {
                    path: path.display().to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "map does not exist"),
                });
            }
            vec![path]
        }
        None => list_maps(folder)?,
    };
    debug!("Batch: {} maps in {}", files.len(), folder.display());

    let mut solutions = Solutions::new();
    let mut solved = 0;
    for path in &files {
        let name = file_name(path);
        match solve_map_file(path, options, observer) {
            Ok(report) => {
                let commands = report
                    .path()
                    .map(|p| p.command_names())
                    .unwrap_or_default();
                if report.is_solved() {
                    solved += 1;
                }
                solutions.insert(name, commands);
            }
            Err(error) => observer.on_map_failed(&name, &error),
        }
    }

    observer.on_batch_finished(solved, files.len());
    Ok(solutions)
}

fn list_maps(folder: &Path) -> Result<Vec<PathBuf>, MapError> {
    let io_error = |source| MapError::Io {
        path: folder.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(folder).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Writes `solutions` as JSON into `folder` under a timestamped name and
/// returns the file written.
pub fn write_solutions(folder: &Path, solutions: &Solutions) -> io::Result<PathBuf> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = format_description::parse("[year][month][day]-[hour][minute][second]")
        .map_err(io::Error::other)?;
    let date_time_str = now.format(&format).map_err(io::Error::other)?;

    if !folder.exists() {
        fs::create_dir_all(folder)?;
    }

    let filename = folder.join(format!("solutions - {}.json", date_time_str));
    let json = serde_json::to_string_pretty(solutions).map_err(io::Error::other)?;
    fs::write(&filename, json)?;
    Ok(filename)
}
