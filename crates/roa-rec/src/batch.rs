//! Reading many replays at once.
use crate::{ActionTable, Replay, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

/// File extension of replay files.
pub const REPLAY_EXTENSION: &str = "roa";

/// List the replay files in a directory, sorted by path.
///
/// Subdirectories are not searched.
pub fn find_replays(dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_replay = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case(REPLAY_EXTENSION));
        if is_replay && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Lazily read a list of replay files.
///
/// Each file gets its own result, so one broken replay does not stop the rest from being read.
pub fn read_replays<'t, I>(
    paths: I,
    table: &'t ActionTable,
) -> impl Iterator<Item = (PathBuf, Result<Replay>)> + 't
where
    I: IntoIterator + 't,
    I::Item: Into<PathBuf>,
    I::IntoIter: 't,
{
    paths.into_iter().map(move |path| {
        let path = path.into();
        log::info!("Parsing {}", path.display());
        let result = read_replay(&path, table);
        if let Err(err) = &result {
            log::warn!("Failed to read {}: {}", path.display(), err);
        }
        (path, result)
    })
}

fn read_replay(path: &Path, table: &ActionTable) -> Result<Replay> {
    let file = File::open(path)?;
    Replay::read_with_table(BufReader::new(file), table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn finds_fixture() -> anyhow::Result<()> {
        let paths = find_replays("test/replays")?;
        assert!(paths
            .iter()
            .any(|path| path.ends_with("sample.roa")));
        assert!(paths.iter().all(|path| path.extension().unwrap() == "roa"));
        Ok(())
    }

    #[test]
    fn failures_are_isolated() {
        let table = ActionTable::default();
        let results = read_replays(
            vec![
                "test/replays/does-not-exist.roa",
                "test/replays/sample.roa",
            ],
            &table,
        )
        .collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, Err(Error::IoError(_))));
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn broken_replay_in_a_directory() -> anyhow::Result<()> {
        let table = ActionTable::default();
        let results = read_replays(find_replays("test/replays")?, &table).collect::<Vec<_>>();
        let (broken, ok): (Vec<_>, Vec<_>) = results.iter().partition(|(_, r)| r.is_err());
        assert_eq!(broken.len(), 1);
        assert!(broken[0].0.ends_with("broken.roa"));
        assert!(matches!(
            broken[0].1.as_ref().unwrap_err().root(),
            Error::UnknownCharacterId(42)
        ));
        assert_eq!(ok.len(), 1);
        Ok(())
    }
}
