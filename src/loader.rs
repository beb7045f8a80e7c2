use crate::error::{LoadError, MeritFileError};
use crate::models::{normalize_name, Config, CourseLink, MeritRecord, Unit};
use crate::scoring::global_max_merit;
use log::{debug, info, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEPARTMENT_COLUMN: &str = "Department";
pub const RELATED_DEPT_COLUMN: &str = "Related Dept";
pub const SUBJECT_COLUMN: &str = "Subject";
pub const MERIT_COLUMN: &str = "Merit";

/// Header names accepted for the subject column, in order of preference.
pub const SUBJECT_HEADER_ALIASES: [&str; 2] = [SUBJECT_COLUMN, DEPARTMENT_COLUMN];

static MERIT_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{4})([a-d])\.csv$").expect("merit file name pattern is valid")
});

/// Cycle and unit encoded in a merit file name such as `2122a.csv`.
pub fn merit_file_tag(path: &Path) -> Option<(String, Unit)> {
    let name = path.file_name()?.to_str()?;
    let caps = MERIT_FILE_NAME.captures(name)?;
    let unit = caps.get(2)?.as_str().parse::<Unit>().ok()?;
    Some((caps.get(1)?.as_str().to_string(), unit))
}

/// Ordered candidate directories; the first one holding a file wins.
#[derive(Debug, Clone)]
pub struct DataLocator {
    directories: Vec<PathBuf>,
}

impl DataLocator {
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates(&self, file_name: &str) -> Vec<PathBuf> {
        self.directories
            .iter()
            .map(|dir| dir.join(file_name))
            .collect()
    }

    pub fn locate(&self, file_name: &str) -> Option<PathBuf> {
        self.candidates(file_name)
            .into_iter()
            .find(|path| path.is_file())
    }
}

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Diagnostics collected while loading; nothing here stops the pipeline.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub course_file: PathBuf,
    pub merit_files_loaded: Vec<PathBuf>,
    pub merit_files_missing: Vec<String>,
    pub merit_files_skipped: Vec<SkippedFile>,
    pub dropped_link_rows: usize,
    pub dropped_merit_rows: usize,
}

/// Immutable snapshot of both datasets, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct DataContext {
    course_links: Vec<CourseLink>,
    merit_records: Vec<MeritRecord>,
    global_max_merit: Option<f64>,
    report: LoadReport,
}

impl DataContext {
    pub fn new(course_links: Vec<CourseLink>, merit_records: Vec<MeritRecord>) -> Self {
        Self::with_report(course_links, merit_records, LoadReport::default())
    }

    fn with_report(
        course_links: Vec<CourseLink>,
        merit_records: Vec<MeritRecord>,
        report: LoadReport,
    ) -> Self {
        let global_max_merit = global_max_merit(&merit_records);
        Self {
            course_links,
            merit_records,
            global_max_merit,
            report,
        }
    }

    pub fn course_links(&self) -> &[CourseLink] {
        &self.course_links
    }

    pub fn merit_records(&self) -> &[MeritRecord] {
        &self.merit_records
    }

    pub fn global_max_merit(&self) -> Option<f64> {
        self.global_max_merit
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Distinct source departments in first-seen order.
    pub fn departments(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.course_links
            .iter()
            .map(|link| link.department.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

pub struct DatasetLoader {
    locator: DataLocator,
    course_file: String,
    merit_file_names: Vec<String>,
}

impl DatasetLoader {
    pub fn new(config: &Config) -> Self {
        let merit_file_names = config
            .cycles
            .iter()
            .flat_map(|cycle| {
                config
                    .units
                    .iter()
                    .map(move |unit| format!("{}{}.csv", cycle, unit.trim().to_lowercase()))
            })
            .collect();

        Self {
            locator: DataLocator::new(config.data_directories.iter()),
            course_file: config.course_file.clone(),
            merit_file_names,
        }
    }

    pub fn load(&self) -> Result<DataContext, LoadError> {
        let course_path =
            self.locator
                .locate(&self.course_file)
                .ok_or_else(|| LoadError::MissingPrimaryData {
                    file: self.course_file.clone(),
                    candidates: self.locator.candidates(&self.course_file),
                })?;

        let mut report = LoadReport {
            course_file: course_path.clone(),
            ..LoadReport::default()
        };

        let (course_links, dropped_links) = read_course_links(&course_path)?;
        report.dropped_link_rows = dropped_links;

        let mut merit_records = Vec::new();
        for file_name in &self.merit_file_names {
            let Some(path) = self.locator.locate(file_name) else {
                debug!("Merit file {} not found, skipping", file_name);
                report.merit_files_missing.push(file_name.clone());
                continue;
            };

            match read_merit_file(&path) {
                Ok(batch) => {
                    report.dropped_merit_rows += batch.dropped_rows;
                    merit_records.extend(batch.records);
                    report.merit_files_loaded.push(path);
                }
                Err(e) => {
                    warn!("Discarding merit file {}: {}", path.display(), e);
                    report.merit_files_skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Loaded {} course links and {} merit records from {} merit files",
            course_links.len(),
            merit_records.len(),
            report.merit_files_loaded.len()
        );

        Ok(DataContext::with_report(course_links, merit_records, report))
    }
}

fn trimmed_headers(headers: &csv::StringRecord) -> Vec<String> {
    headers.iter().map(|h| h.trim().to_string()).collect()
}

fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Reads the course relationship table, returning the links and the number of dropped rows.
pub fn read_course_links(path: &Path) -> Result<(Vec<CourseLink>, usize), LoadError> {
    let csv_error = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = trimmed_headers(reader.headers().map_err(csv_error)?);

    let department_idx = column_index(&headers, DEPARTMENT_COLUMN);
    let related_idx = column_index(&headers, RELATED_DEPT_COLUMN);
    let (Some(department_idx), Some(related_idx)) = (department_idx, related_idx) else {
        let columns = [DEPARTMENT_COLUMN, RELATED_DEPT_COLUMN]
            .iter()
            .filter(|name| column_index(&headers, name).is_none())
            .map(|name| name.to_string())
            .collect();
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            columns,
        });
    };

    let mut links = Vec::new();
    let mut dropped = 0;
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let department = record.get(department_idx).unwrap_or_default();
        let related = record.get(related_idx).unwrap_or_default();
        match CourseLink::from_raw(department, related) {
            Some(link) => links.push(link),
            None => dropped += 1,
        }
    }

    Ok((links, dropped))
}

#[derive(Debug, Clone, Default)]
pub struct MeritBatch {
    pub records: Vec<MeritRecord>,
    pub dropped_rows: usize,
}

/// Parses one merit file, tagging its rows with the cycle and unit from the file name.
pub fn read_merit_file(path: &Path) -> Result<MeritBatch, MeritFileError> {
    let (cycle, unit) = merit_file_tag(path).ok_or(MeritFileError::UnrecognizedName)?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = trimmed_headers(reader.headers()?);

    let subject_idx = SUBJECT_HEADER_ALIASES
        .iter()
        .find_map(|name| column_index(&headers, name));
    let merit_idx = column_index(&headers, MERIT_COLUMN);
    let (Some(subject_idx), Some(merit_idx)) = (subject_idx, merit_idx) else {
        let mut missing = Vec::new();
        if subject_idx.is_none() {
            missing.push(SUBJECT_COLUMN.to_string());
        }
        if merit_idx.is_none() {
            missing.push(MERIT_COLUMN.to_string());
        }
        return Err(MeritFileError::MissingColumns(missing));
    };

    let mut batch = MeritBatch::default();
    for result in reader.records() {
        let record = result?;
        let subject = normalize_name(record.get(subject_idx).unwrap_or_default());
        let merit = parse_merit(record.get(merit_idx).unwrap_or_default());
        match merit {
            Some(merit) if !subject.is_empty() => batch.records.push(MeritRecord {
                subject,
                merit,
                unit,
                admission_cycle: cycle.clone(),
            }),
            _ => batch.dropped_rows += 1,
        }
    }

    Ok(batch)
}

fn parse_merit(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|merit| merit.is_finite())
}
