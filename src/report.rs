use anyhow::Result;
use csv::Writer;
use std::fs;
use std::path::Path;

use crate::centrality::{write_rankings_csv, DepartmentRanking};
use crate::links::{FlowDiagram, NetworkStats};
use crate::loader::LoadReport;
use crate::models::{AggregatedEdge, DepartmentProfile, MeritRange, Recommendation};

pub const UNAVAILABLE: &str = "Merit data unavailable";
pub const NO_STRONG_CONNECTIONS: &str = "No strong connections found";

/// Files and directories this tool writes into the output directory.
const GENERATED_ITEMS: [&str; 5] = [
    "edges.csv",
    "flow.json",
    "rankings.csv",
    "prestige.csv",
    "recommendations",
];

fn format_range(range: Option<MeritRange>) -> String {
    match range {
        Some(range) => range.to_string(),
        None => UNAVAILABLE.to_string(),
    }
}

fn format_prestige(prestige: Option<f64>) -> String {
    match prestige {
        Some(score) => format!("{:.1}", score),
        None => UNAVAILABLE.to_string(),
    }
}

/// File-system safe variant of a department name.
pub fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

pub fn write_edges_csv(edges: &[AggregatedEdge], output_dir: &Path) -> Result<()> {
    let mut writer = Writer::from_path(output_dir.join("edges.csv"))?;
    writer.write_record(["Department", "Related Dept", "Shared Courses"])?;
    for edge in edges {
        writer.write_record([
            &edge.department,
            &edge.related_department,
            &edge.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_flow_json(diagram: &FlowDiagram, output_dir: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(diagram)?;
    fs::write(output_dir.join("flow.json"), content)?;
    Ok(())
}

pub fn write_rankings(rankings: &[DepartmentRanking], output_dir: &Path) -> Result<()> {
    let file = fs::File::create(output_dir.join("rankings.csv"))?;
    write_rankings_csv(rankings, file)?;
    Ok(())
}

pub fn write_prestige_csv(profiles: &[DepartmentProfile], output_dir: &Path) -> Result<()> {
    let mut writer = Writer::from_path(output_dir.join("prestige.csv"))?;
    writer.write_record([
        "Department",
        "Search Term",
        "Matched Rows",
        "Prestige Score",
        "Merit Min",
        "Merit Max",
    ])?;
    for profile in profiles {
        let prestige = profile
            .prestige_score
            .map(|score| format!("{:.2}", score))
            .unwrap_or_default();
        let (min, max) = profile
            .merit_range
            .map(|range| (range.min.to_string(), range.max.to_string()))
            .unwrap_or_default();
        writer.write_record([
            &profile.department,
            &profile.search_term,
            &profile.matched_rows.to_string(),
            &prestige,
            &min,
            &max,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Plain-text card for one department, with explicit placeholders for missing data.
pub fn render_recommendation(recommendation: &Recommendation) -> String {
    let mut content = String::new();
    content.push_str(&format!("Department: {}\n", recommendation.department));
    content.push_str(&format!("{}\n\n", "=".repeat(12 + recommendation.department.len())));
    content.push_str(&format!(
        "Merit search term: {}\n\
        Prestige score: {}\n\
        Historical merit range: {}\n\
        Connected departments: {}\n\n",
        recommendation.search_term,
        format_prestige(recommendation.own_prestige),
        format_range(recommendation.own_merit_range),
        recommendation.total_related_count,
    ));

    if !recommendation.has_strong_connections() {
        content.push_str(&format!("{}\n", NO_STRONG_CONNECTIONS));
        return content;
    }

    content.push_str("Recommended related departments:\n");
    for (i, entry) in recommendation.entries.iter().enumerate() {
        content.push_str(&format!(
            "{}. {} - {} shared courses ({:.0}%)\n   Merit range: {}\n",
            i + 1,
            entry.related_department,
            entry.shared_course_count,
            entry.visibility_ratio * 100.0,
            format_range(entry.merit_range),
        ));
    }
    content
}

pub fn write_recommendation(recommendation: &Recommendation, output_dir: &Path) -> Result<()> {
    let dir = output_dir.join("recommendations");
    fs::create_dir_all(&dir)?;
    let stem = safe_file_name(&recommendation.department);
    fs::write(
        dir.join(format!("{}.txt", stem)),
        render_recommendation(recommendation),
    )?;
    fs::write(
        dir.join(format!("{}.json", stem)),
        serde_json::to_string_pretty(recommendation)?,
    )?;
    Ok(())
}

pub fn print_load_summary(report: &LoadReport) {
    println!("📄 Course relationships: {}", report.course_file.display());
    if report.dropped_link_rows > 0 {
        println!("   🔄 Dropped {} incomplete course rows", report.dropped_link_rows);
    }
    println!("📚 Merit files loaded: {}", report.merit_files_loaded.len());
    for skipped in &report.merit_files_skipped {
        println!("   ⚠️  Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    if report.dropped_merit_rows > 0 {
        println!("   🔄 Dropped {} unparseable merit rows", report.dropped_merit_rows);
    }
}

pub fn print_summary(
    stats: &NetworkStats,
    min_weight: u32,
    rankings: &[DepartmentRanking],
    recommendation: Option<&Recommendation>,
) {
    println!("\n📊 SUMMARY");
    println!("==========\n");

    println!(
        "🕸️  Network (min strength {}): {} departments, {} connections, {} shared courses",
        min_weight, stats.departments, stats.edges, stats.shared_courses
    );
    if stats.edges == 0 {
        println!("   ❓ The current filter excludes every connection");
    }

    println!("\n📈 Department Rankings (most to least influential):");
    for (i, ranking) in rankings.iter().take(10).enumerate() {
        println!(
            "   {}. {} - influence {:.3}, outreach {:.3}",
            i + 1,
            ranking.department,
            ranking.influence,
            ranking.outreach
        );
    }

    if let Some(recommendation) = recommendation {
        println!("\n🎯 Recommendation card:");
        for line in render_recommendation(recommendation).lines() {
            println!("   {}", line);
        }
    }
}

/// Removes results of a previous run, leaving unrelated files alone.
pub fn clean_output_directory(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        return Ok(());
    }

    for item in &GENERATED_ITEMS {
        let item_path = output_dir.join(item);
        if item_path.is_file() {
            fs::remove_file(&item_path)?;
            log::debug!("Removed file: {}", item_path.display());
        } else if item_path.is_dir() {
            fs::remove_dir_all(&item_path)?;
            log::debug!("Removed directory: {}", item_path.display());
        }
    }
    Ok(())
}
