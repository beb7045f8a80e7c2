use crate::loader::DataContext;
use crate::models::{
    normalize_name, Config, DepartmentProfile, MeritScore, Recommendation, RecommendationEntry,
};
use crate::reconcile::{find_merit_rows, AliasMap};
use crate::scoring::score;
use std::collections::HashMap;

pub const DEFAULT_VISIBILITY_THRESHOLD: usize = 3;
pub const DEFAULT_PROGRESS_CAP: usize = 10;

/// Query-time view over an immutable data snapshot.
pub struct DepartmentAnalyzer<'a> {
    context: &'a DataContext,
    aliases: &'a AliasMap,
    pub visibility_threshold: usize,
    pub progress_cap: usize,
}

impl<'a> DepartmentAnalyzer<'a> {
    pub fn new(context: &'a DataContext, aliases: &'a AliasMap) -> Self {
        Self {
            context,
            aliases,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            progress_cap: DEFAULT_PROGRESS_CAP,
        }
    }

    pub fn with_config(context: &'a DataContext, aliases: &'a AliasMap, config: &Config) -> Self {
        Self {
            context,
            aliases,
            visibility_threshold: config.visibility_threshold,
            progress_cap: config.progress_cap,
        }
    }

    /// Resolve a department through the alias map and score its merit rows
    pub fn merit_score(&self, department: &str) -> (String, usize, MeritScore) {
        let search_term = self.aliases.resolve_search_term(department);
        let rows = find_merit_rows(self.context.merit_records(), &search_term);
        let result = score(&rows, self.context.global_max_merit());
        (search_term, rows.len(), result)
    }

    /// Related departments for `selected_department`, strongest first.
    ///
    /// `total_related_count` counts every distinct related department before the
    /// visibility threshold is applied.
    pub fn recommend(&self, selected_department: &str) -> Recommendation {
        let selected = normalize_name(selected_department);

        // Step 1: Count shared courses per related department, first-seen order
        let mut order: Vec<(&str, usize)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for link in self.context.course_links() {
            if link.department != selected {
                continue;
            }
            let related = link.related_department.as_str();
            match positions.get(related) {
                Some(&i) => order[i].1 += 1,
                None => {
                    positions.insert(related, order.len());
                    order.push((related, 1));
                }
            }
        }
        let total_related_count = order.len();

        // Step 2: Keep strong connections, stable sort keeps first-seen order on ties
        let mut strong: Vec<(&str, usize)> = order
            .into_iter()
            .filter(|(_, count)| *count >= self.visibility_threshold)
            .collect();
        strong.sort_by(|a, b| b.1.cmp(&a.1));

        // Step 3: Enrich with strength ratio and merit range
        let cap = self.progress_cap.max(1) as f64;
        let entries = strong
            .into_iter()
            .map(|(related, count)| {
                let (_, _, merit) = self.merit_score(related);
                RecommendationEntry {
                    related_department: related.to_string(),
                    shared_course_count: count,
                    visibility_ratio: (count as f64 / cap).min(1.0),
                    merit_range: merit.merit_range,
                }
            })
            .collect();

        let (search_term, _, own) = self.merit_score(&selected);

        Recommendation {
            department: selected,
            search_term,
            total_related_count,
            entries,
            own_prestige: own.prestige_score,
            own_merit_range: own.merit_range,
        }
    }

    /// Merit profile for every source department, in first-seen order.
    pub fn prestige_table(&self) -> Vec<DepartmentProfile> {
        self.context
            .departments()
            .into_iter()
            .map(|department| {
                let (search_term, matched_rows, merit) = self.merit_score(department);
                DepartmentProfile {
                    department: department.to_string(),
                    search_term,
                    matched_rows,
                    prestige_score: merit.prestige_score,
                    merit_range: merit.merit_range,
                }
            })
            .collect()
    }
}
