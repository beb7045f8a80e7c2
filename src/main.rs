use academic_network_analyzer::centrality::DepartmentGraph;
use academic_network_analyzer::links::{aggregate, flow_diagram, network_stats};
use academic_network_analyzer::models::MIN_WEIGHT_RANGE;
use academic_network_analyzer::models::normalize_name;
use academic_network_analyzer::{report, AliasMap, Config, DatasetLoader, DepartmentAnalyzer, LoadError};
use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

fn cli() -> Command {
    Command::new("academic-network-analyzer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Analyzes interdisciplinary department networks and admission merit data")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("department")
                .short('d')
                .long("department")
                .value_name("NAME")
                .help("Department to build a recommendation card for"),
        )
        .arg(
            Arg::new("min-weight")
                .short('w')
                .long("min-weight")
                .value_name("N")
                .help("Minimum connection strength (1-10), overrides the config value")
                .value_parser(value_parser!(u32).range(
                    *MIN_WEIGHT_RANGE.start() as i64..=*MIN_WEIGHT_RANGE.end() as i64,
                )),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory, overrides the config value"),
        )
        .arg(
            Arg::new("list-departments")
                .long("list-departments")
                .help("Print every department found in the course relationships and exit")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();
    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    // Load or create configuration
    let mut config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        Config::default().save_to_file(config_file)?;
        println!(
            "⚠️  Please review {} (data directories, aliases) and run the program again.",
            config_file
        );
        return Ok(ExitCode::SUCCESS);
    };

    if let Some(min_weight) = matches.get_one::<u32>("min-weight") {
        config.min_weight = *min_weight;
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output_directory = Some(output.clone());
    }
    config.validate()?;

    println!("📂 Data directories: {}", config.data_directories.join(", "));

    let context = match DatasetLoader::new(&config).load() {
        Ok(context) => context,
        Err(e @ LoadError::MissingPrimaryData { .. }) => {
            println!("❌ Error: {}", e);
            println!("   Place {} in one of the data directories listed in {}", config.course_file, config_file);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };
    report::print_load_summary(context.report());

    if matches.get_flag("list-departments") {
        println!("\n🏛️  Departments:");
        for department in context.departments() {
            println!("   - {}", department);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if context.course_links().is_empty() {
        println!("❌ No course relationships found in {}", context.report().course_file.display());
        return Ok(ExitCode::FAILURE);
    }

    let aliases = AliasMap::from_config(&config.aliases);
    if aliases.is_empty() {
        println!("⚠️  No department aliases configured, names are matched against merit subjects as-is");
    }
    let analyzer = DepartmentAnalyzer::with_config(&context, &aliases, &config);

    // Network views are recomputed from the snapshot for the current filter
    let edges = aggregate(context.course_links(), config.min_weight);
    let stats = network_stats(&edges);
    let graph = DepartmentGraph::from_edges(&edges);
    let rankings = graph.rankings();
    let profiles = analyzer.prestige_table();

    let recommendation = matches.get_one::<String>("department").map(|raw| {
        let department = normalize_name(raw);
        if !graph.contains(&department) {
            println!("⚠️  {} has no connections at minimum strength {}", department, config.min_weight);
        }
        analyzer.recommend(&department)
    });

    let output_dir = config.output_directory.as_deref().unwrap_or("output");
    let output_path = Path::new(output_dir);
    fs::create_dir_all(output_path)?;
    report::clean_output_directory(output_path)?;

    report::write_edges_csv(&edges, output_path)?;
    report::write_flow_json(&flow_diagram(&edges), output_path)?;
    report::write_rankings(&rankings, output_path)?;
    report::write_prestige_csv(&profiles, output_path)?;
    if let Some(recommendation) = &recommendation {
        report::write_recommendation(recommendation, output_path)?;
    }

    report::print_summary(&stats, config.min_weight, &rankings, recommendation.as_ref());

    println!("\n✅ Analysis complete!");
    println!("📂 Results: {}", output_dir);
    Ok(ExitCode::SUCCESS)
}
