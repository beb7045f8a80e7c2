use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::reconcile::DEFAULT_ALIASES;

/// Allowed range for the minimum connection strength control.
pub const MIN_WEIGHT_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Data source configuration
    pub data_directories: Vec<String>,
    pub course_file: String,
    pub cycles: Vec<String>,
    pub units: Vec<String>,
    // Tunables
    pub min_weight: u32,
    pub visibility_threshold: usize,
    pub progress_cap: usize,
    pub output_directory: Option<String>,
    pub aliases: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directories: vec![
                "data".to_string(),
                "../data".to_string(),
                ".".to_string(),
            ],
            course_file: "related-course.csv".to_string(),
            cycles: vec![
                "2122".to_string(),
                "2223".to_string(),
                "2324".to_string(),
            ],
            units: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
            min_weight: 1,
            visibility_threshold: 3,
            progress_cap: 10,
            output_directory: Some("output".to_string()),
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(short, canonical)| (short.to_string(), canonical.to_string()))
                .collect(),
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read config file: {}", file_path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", file_path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !MIN_WEIGHT_RANGE.contains(&self.min_weight) {
            bail!(
                "min_weight must be between {} and {}, got {}",
                MIN_WEIGHT_RANGE.start(),
                MIN_WEIGHT_RANGE.end(),
                self.min_weight
            );
        }
        if self.visibility_threshold == 0 {
            bail!("visibility_threshold must be at least 1");
        }
        if self.progress_cap == 0 {
            bail!("progress_cap must be at least 1");
        }
        if self.data_directories.is_empty() {
            bail!("data_directories must list at least one candidate directory");
        }
        for cycle in &self.cycles {
            if cycle.len() != 4 || !cycle.chars().all(|c| c.is_ascii_digit()) {
                bail!("cycle '{}' must be four digits, e.g. 2122", cycle);
            }
        }
        for unit in &self.units {
            unit.parse::<Unit>()?;
        }
        Ok(())
    }
}

/// Admission unit under which a merit list is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Unit {
    A,
    B,
    C,
    D,
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Unit::A),
            "B" => Ok(Unit::B),
            "C" => Ok(Unit::C),
            "D" => Ok(Unit::D),
            other => bail!("unknown admission unit '{}', expected one of a, b, c, d", other),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Unit::A => "A",
            Unit::B => "B",
            Unit::C => "C",
            Unit::D => "D",
        };
        f.write_str(letter)
    }
}

/// One shared course between two departments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseLink {
    pub department: String,
    pub related_department: String,
}

impl CourseLink {
    /// Builds a link from raw cell values, `None` when either side is blank.
    pub fn from_raw(department: &str, related_department: &str) -> Option<Self> {
        let department = normalize_name(department);
        let related_department = normalize_name(related_department);
        if department.is_empty() || related_department.is_empty() {
            return None;
        }
        Some(Self {
            department,
            related_department,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeritRecord {
    pub subject: String,
    pub merit: f64,
    pub unit: Unit,
    pub admission_cycle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedEdge {
    pub department: String,
    pub related_department: String,
    pub count: usize,
}

/// Whole-number merit bounds, floored from the raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeritRange {
    pub min: i64,
    pub max: i64,
}

impl fmt::Display for MeritRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeritScore {
    pub prestige_score: Option<f64>,
    pub merit_range: Option<MeritRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub related_department: String,
    pub shared_course_count: usize,
    pub visibility_ratio: f64,
    pub merit_range: Option<MeritRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub department: String,
    pub search_term: String,
    pub total_related_count: usize,
    pub entries: Vec<RecommendationEntry>,
    pub own_prestige: Option<f64>,
    pub own_merit_range: Option<MeritRange>,
}

impl Recommendation {
    pub fn has_strong_connections(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Per-department merit summary used for the prestige table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentProfile {
    pub department: String,
    pub search_term: String,
    pub matched_rows: usize,
    pub prestige_score: Option<f64>,
    pub merit_range: Option<MeritRange>,
}

/// Normalize a department or subject name by stripping surrounding whitespace
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_weight, 1);
        assert_eq!(config.visibility_threshold, 3);
        assert_eq!(config.progress_cap, 10);
        assert_eq!(
            config.aliases.get("CSE").map(String::as_str),
            Some("Computer Science and Engineering")
        );
    }

    #[test]
    fn validate_rejects_out_of_range_min_weight() {
        let config = Config {
            min_weight: 11,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            min_weight: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_cycle_and_unit() {
        let config = Config {
            cycles: vec!["21-22".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            units: vec!["e".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_round_trips_through_toml_with_partial_file() {
        let config: Config = toml::from_str("min_weight = 4\nprogress_cap = 5\n").unwrap();
        assert_eq!(config.min_weight, 4);
        assert_eq!(config.progress_cap, 5);
        assert_eq!(config.course_file, "related-course.csv");
        assert_eq!(config.units.len(), 4);
    }

    #[test]
    fn unit_parses_case_insensitively() {
        assert_eq!("a".parse::<Unit>().unwrap(), Unit::A);
        assert_eq!(" D ".parse::<Unit>().unwrap(), Unit::D);
        assert!("x".parse::<Unit>().is_err());
        assert_eq!(Unit::C.to_string(), "C");
    }

    #[test]
    fn course_link_drops_blank_sides() {
        assert!(CourseLink::from_raw("  ", "EEE").is_none());
        assert!(CourseLink::from_raw("CSE", "").is_none());
        let link = CourseLink::from_raw(" CSE ", "EEE\t").unwrap();
        assert_eq!(link.department, "CSE");
        assert_eq!(link.related_department, "EEE");
    }

    #[test]
    fn normalize_name_only_strips_the_edges() {
        assert_eq!(normalize_name("  Applied  Physics \n"), "Applied  Physics");
    }
}
