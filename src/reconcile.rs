use crate::models::{normalize_name, MeritRecord};
use log::warn;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Short codes and alternate display names mapped to the subject names used in merit lists.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("CSE", "Computer Science and Engineering"),
    ("EEE", "Electrical and Electronic Engineering"),
    ("ECE", "Electronics and Communication Engineering"),
    ("ME", "Mechanical Engineering"),
    ("CE", "Civil Engineering"),
    ("ARCH", "Architecture"),
    ("BBA", "Business Administration"),
    ("MIS", "Management Information Systems"),
    ("AIS", "Accounting and Information Systems"),
    ("ECO", "Economics"),
    ("ENG", "English"),
    ("BAN", "Bangla"),
    ("MAT", "Mathematics"),
    ("PHY", "Physics"),
    ("CHE", "Chemistry"),
    ("STAT", "Statistics"),
    ("BMB", "Biochemistry and Molecular Biology"),
    ("GEB", "Genetic Engineering and Biotechnology"),
    ("MCB", "Microbiology"),
    ("PHR", "Pharmacy"),
    ("PSY", "Psychology"),
    ("SOC", "Sociology"),
    ("POL", "Political Science"),
    ("IR", "International Relations"),
    ("MCJ", "Mass Communication and Journalism"),
    ("LAW", "Law"),
    ("GEO", "Geography and Environment"),
    ("Env Sci", "Environmental Science"),
    ("Applied Maths", "Applied Mathematics"),
    ("Nuclear Engg", "Nuclear Engineering"),
    ("Robotics", "Robotics and Mechatronics Engineering"),
];

/// Static lookup from a department short code or display name to its merit-list search term.
#[derive(Debug, Clone)]
pub struct AliasMap {
    entries: HashMap<String, String>,
}

impl AliasMap {
    /// Builds the map, collapsing alias chains so every value is terminal.
    ///
    /// A chain such as `A -> B, B -> C` resolves `A` straight to `C`. Entries that
    /// loop back onto themselves are dropped and fall back to identity.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let raw: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (normalize_name(k.as_ref()), normalize_name(v.as_ref())))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty() && k != v)
            .collect();

        let mut entries = HashMap::with_capacity(raw.len());
        for key in raw.keys() {
            let mut seen = HashSet::new();
            seen.insert(key.as_str());
            let mut current = &raw[key];
            let mut cyclic = false;
            while let Some(next) = raw.get(current) {
                if !seen.insert(current.as_str()) {
                    cyclic = true;
                    break;
                }
                current = next;
            }
            if cyclic {
                warn!("Alias '{}' forms a cycle, using the name as-is", key);
                continue;
            }
            entries.insert(key.clone(), current.clone());
        }

        Self { entries }
    }

    pub fn from_config(aliases: &BTreeMap<String, String>) -> Self {
        Self::new(aliases.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the canonical merit-list name for `department_name`, or the name itself.
    pub fn resolve_search_term(&self, department_name: &str) -> String {
        let name = normalize_name(department_name);
        match self.entries.get(&name) {
            Some(canonical) => canonical.clone(),
            None => name,
        }
    }
}

impl Default for AliasMap {
    fn default() -> Self {
        Self::new(DEFAULT_ALIASES.iter().copied())
    }
}

/// All merit rows whose subject contains `search_term`, ignoring case.
///
/// Substring containment is deliberately permissive: one term can match several
/// program variants, and short terms may pick up unrelated subjects.
pub fn find_merit_rows<'a>(
    merit_records: &'a [MeritRecord],
    search_term: &str,
) -> Vec<&'a MeritRecord> {
    let needle = search_term.to_lowercase();
    merit_records
        .iter()
        .filter(|record| record.subject.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    fn merit(subject: &str, value: f64) -> MeritRecord {
        MeritRecord {
            subject: subject.to_string(),
            merit: value,
            unit: Unit::A,
            admission_cycle: "2324".to_string(),
        }
    }

    #[test]
    fn resolves_known_alias_and_falls_back_to_identity() {
        let aliases = AliasMap::default();
        assert_eq!(
            aliases.resolve_search_term("CSE"),
            "Computer Science and Engineering"
        );
        assert_eq!(aliases.resolve_search_term(" Zoology "), "Zoology");
    }

    #[test]
    fn resolve_is_idempotent_over_default_aliases() {
        let aliases = AliasMap::default();
        for (short, _) in DEFAULT_ALIASES {
            let once = aliases.resolve_search_term(short);
            let twice = aliases.resolve_search_term(&once);
            assert_eq!(once, twice, "double mapping for {}", short);
        }
    }

    #[test]
    fn alias_chains_collapse_to_terminal_name() {
        let aliases = AliasMap::new([("CS", "CSE"), ("CSE", "Computer Science")]);
        assert_eq!(aliases.resolve_search_term("CS"), "Computer Science");
        assert_eq!(
            aliases.resolve_search_term(&aliases.resolve_search_term("CS")),
            "Computer Science"
        );
    }

    #[test]
    fn alias_cycles_fall_back_to_identity() {
        let aliases = AliasMap::new([("A", "B"), ("B", "A"), ("C", "Chemistry")]);
        assert_eq!(aliases.resolve_search_term("A"), "A");
        assert_eq!(aliases.resolve_search_term("B"), "B");
        assert_eq!(aliases.resolve_search_term("C"), "Chemistry");
        assert_eq!(aliases.len(), 1);
    }

    #[test]
    fn empty_alias_table_is_reported_empty() {
        let none = AliasMap::new(Vec::<(&str, &str)>::new());
        assert!(none.is_empty());
        assert_eq!(none.resolve_search_term("CSE"), "CSE");
        assert!(!AliasMap::default().is_empty());
        assert!(AliasMap::from_config(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn find_merit_rows_matches_case_insensitive_substrings_only() {
        let records = vec![
            merit("Computer Science and Engineering", 50.0),
            merit("computer science and engineering (evening)", 80.0),
            merit("Electrical and Electronic Engineering", 120.0),
        ];

        let found = find_merit_rows(&records, "COMPUTER SCIENCE");
        assert_eq!(found.len(), 2);
        assert!(found
            .iter()
            .all(|r| r.subject.to_lowercase().contains("computer science")));

        assert!(find_merit_rows(&records, "Zoology").is_empty());
    }

    #[test]
    fn short_terms_match_permissively() {
        let records = vec![merit("Law", 300.0), merit("Islamic Law and Jurisprudence", 900.0)];
        assert_eq!(find_merit_rows(&records, "law").len(), 2);
    }
}
