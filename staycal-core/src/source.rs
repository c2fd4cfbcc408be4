//! Day-range sources: where batches of day records come from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::day::DayRecord;
use crate::diagnostics::Diagnostic;
use crate::error::{StayCalError, StayCalResult};
use crate::feed::decode_str;

/// Days fetched for one range, with whatever went wrong decoding them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBatch {
    pub days: Vec<DayRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DayBatch {
    pub fn new(days: Vec<DayRecord>) -> Self {
        DayBatch {
            days,
            diagnostics: Vec::new(),
        }
    }
}

/// Supplies the days of an inclusive date range.
pub trait DayRangeSource {
    fn fetch_range(&mut self, start: NaiveDate, end: NaiveDate) -> StayCalResult<DayBatch>;
}

impl<F> DayRangeSource for F
where
    F: FnMut(NaiveDate, NaiveDate) -> StayCalResult<DayBatch>,
{
    fn fetch_range(&mut self, start: NaiveDate, end: NaiveDate) -> StayCalResult<DayBatch> {
        self(start, end)
    }
}

/// Reads every `*.json` feed file in a directory.
///
/// Files are read in name order, so when two files disagree about a date
/// the one that sorts first is seen first. A file that cannot be read or
/// is not valid JSON is reported and skipped.
///
/// Problems that carry no date (broken files, dateless entries) are
/// reported on the first fetch that reads the file, not on every fetch.
#[derive(Debug, Clone)]
pub struct FeedDirSource {
    dir: PathBuf,
    visited: HashSet<PathBuf>,
}

impl FeedDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> StayCalResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(StayCalError::FeedDirNotFound(dir.display().to_string()));
        }
        Ok(FeedDirSource {
            dir,
            visited: HashSet::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn feed_files(&self) -> StayCalResult<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "json"))
            .collect();
        files.sort();
        Ok(files)
    }
}

impl DayRangeSource for FeedDirSource {
    fn fetch_range(&mut self, start: NaiveDate, end: NaiveDate) -> StayCalResult<DayBatch> {
        let mut batch = DayBatch::default();
        let in_range = |date: NaiveDate| start <= date && date <= end;

        for path in self.feed_files()? {
            let first_visit = self.visited.insert(path.clone());

            let decoded = std::fs::read_to_string(&path)
                .map_err(StayCalError::from)
                .and_then(|content| decode_str(&content));

            let (days, diagnostics) = match decoded {
                Ok(decoded) => decoded,
                Err(e) => {
                    if first_visit {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable feed file");
                        batch.diagnostics.push(Diagnostic::malformed(
                            None,
                            format!("{}: {}", path.display(), e),
                        ));
                    }
                    continue;
                }
            };

            batch
                .days
                .extend(days.into_iter().filter(|d| in_range(d.date)));
            batch.diagnostics.extend(diagnostics.into_iter().filter(|d| match d.date() {
                Some(date) => in_range(date),
                None => first_visit,
            }));
        }

        tracing::debug!(
            dir = %self.dir.display(),
            %start,
            %end,
            days = batch.days.len(),
            "fetched feed range"
        );

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayStatus;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let err = FeedDirSource::new("/definitely/not/a/feed/dir").unwrap_err();
        assert!(matches!(err, StayCalError::FeedDirNotFound(_)));
    }

    #[test]
    fn test_fetch_filters_by_range_and_reads_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("2024-01.json"),
            r#"[
                {"date": "2024-01-30", "status": "unavailable", "note": "Paint"},
                {"date": "2024-01-31", "status": "available"}
            ]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("2024-02.json"),
            r#"[
                {"date": "2024-01-31", "status": "unavailable", "note": "Late copy"},
                {"date": "2024-02-01", "status": "available"},
                {"status": "available"}
            ]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a feed").unwrap();

        let mut source = FeedDirSource::new(dir.path()).unwrap();
        let batch = source
            .fetch_range(date("2024-01-31"), date("2024-02-29"))
            .unwrap();

        let dates: Vec<_> = batch.days.iter().map(|d| (d.date, d.status)).collect();
        assert_eq!(
            dates,
            vec![
                (date("2024-01-31"), DayStatus::Available),
                (date("2024-01-31"), DayStatus::Unavailable),
                (date("2024-02-01"), DayStatus::Available),
            ]
        );
        assert_eq!(batch.diagnostics.len(), 1);
    }

    #[test]
    fn test_broken_file_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{ not json").unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"[{"date": "2024-01-01", "status": "available"}]"#,
        )
        .unwrap();

        let mut source = FeedDirSource::new(dir.path()).unwrap();
        let batch = source
            .fetch_range(date("2024-01-01"), date("2024-01-31"))
            .unwrap();

        assert_eq!(batch.days.len(), 1);
        assert_eq!(batch.diagnostics.len(), 1);
        assert!(batch.diagnostics[0].is_malformed());
    }

    #[test]
    fn test_non_utf8_file_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), [0xff, 0xfe, 0x00]).unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"[{"date": "2024-01-01", "status": "available"}]"#,
        )
        .unwrap();

        let mut source = FeedDirSource::new(dir.path()).unwrap();
        let batch = source
            .fetch_range(date("2024-01-01"), date("2024-01-31"))
            .unwrap();

        assert_eq!(batch.days.len(), 1);
        assert_eq!(batch.diagnostics.len(), 1);
        assert!(batch.diagnostics[0].is_malformed());
        assert_eq!(batch.diagnostics[0].date(), None);
    }

    #[test]
    fn test_dateless_problems_reported_once_per_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{ not json").unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"[
                {"date": "2024-01-10", "status": "pending"},
                {"date": "2024-02-10", "status": "pending"},
                {"status": "available"}
            ]"#,
        )
        .unwrap();

        let mut source = FeedDirSource::new(dir.path()).unwrap();
        let january = source
            .fetch_range(date("2024-01-01"), date("2024-01-31"))
            .unwrap();
        let february = source
            .fetch_range(date("2024-02-01"), date("2024-02-29"))
            .unwrap();

        // Broken file, dateless entry and the January entry.
        assert_eq!(january.diagnostics.len(), 3);
        assert_eq!(february.diagnostics.len(), 1);
        assert_eq!(february.diagnostics[0].date(), Some(date("2024-02-10")));
    }

    #[test]
    fn test_closure_source() {
        let mut calls = 0;
        let mut source = |start: NaiveDate, _end: NaiveDate| {
            calls += 1;
            Ok::<_, StayCalError>(DayBatch::new(vec![DayRecord::available(start)]))
        };

        let batch = source
            .fetch_range(date("2024-01-01"), date("2024-01-31"))
            .unwrap();
        assert_eq!(batch.days.len(), 1);
        drop(source);
        assert_eq!(calls, 1);
    }
}
