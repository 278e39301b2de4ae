use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::warn;
use wb_stats_normalizer::{
    api::{collect_roster, SavedRecords, StatsSource, UidCache, WbClient},
    cli::{ApiArgs, Cli, Commands, OutputArgs},
    config::{run_date, DataDir, DEFAULT_DATE_FORMAT},
    names::NameTable,
    normalize::{Normalizer, Record, Value},
    pipeline::{run_batch, BatchReport},
    schema::TargetSchema,
    summary::{player_history, summarize_csv, HISTORY_COLUMNS},
    ui::{ConsoleUi, Phase, Ui, UiApp},
};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse_args();

    // The full-screen view owns the terminal
    if !matches!(cli.command, Commands::Sync { tui: true, .. }) {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
            )
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Sync {
            api,
            output,
            data_dir,
            tui,
        } => {
            let start = Instant::now();
            let data = DataDir::new(data_dir)?;
            let client = connect(&api)?;
            let cache = UidCache::new(data.uid_cache_path());

            if tui {
                let mut ui = UiApp::new()?;
                match sync(&client, &cache, &output, &data, &mut ui) {
                    Ok(report) => ui.finish(&report.summary())?,
                    Err(e) => {
                        ui.restore()?;
                        return Err(e);
                    }
                }
            } else {
                let mut ui = ConsoleUi::new();
                let report = sync(&client, &cache, &output, &data, &mut ui)?;
                print_report(&report, start);
            }
        }

        Commands::Roster { api, data_dir } => {
            let data = DataDir::new(data_dir)?;
            let client = connect(&api)?;
            let cache = UidCache::new(data.uid_cache_path());

            let uids = collect_roster(&client, &cache, &mut ConsoleUi::new())?;
            for uid in &uids {
                println!("{}", uid);
            }
            eprintln!("\n{} players cached in {:?}", uids.len(), cache.path());
        }

        Commands::Player { uid, api } => {
            let client = connect(&api)?;
            let names = NameTable::builtin(Default::default());
            let normalizer = Normalizer::new(names, run_date(DEFAULT_DATE_FORMAT)?);

            let raw = client.fetch_player(&uid)?;
            match normalizer.normalize(&uid, &raw)? {
                Some(row) => print_player(&row),
                None => println!("No stats for player {}", uid),
            }
        }

        Commands::Normalize { input, output } => {
            let start = Instant::now();
            let records = SavedRecords::from_file(&input)?;
            let data = DataDir::new(None)?;

            let mut ui = ConsoleUi::new();
            let report = write_players(&records, &records.uids(), &output, &data, &mut ui)?;
            print_report(&report, start);
        }

        Commands::Headers { names, names_file } => {
            let table = NameTable::load(names, names_file.as_deref())?;
            for column in TargetSchema::builtin(&table).iter() {
                println!("{}", column);
            }
        }

        Commands::History {
            uid,
            csv,
            data_dir,
            json,
        } => {
            let path = match csv {
                Some(path) => path,
                None => DataDir::new(data_dir)?.default_csv_path(),
            };
            let history = player_history(&path, &uid)?;

            if history.rows.is_empty() {
                println!("No rows for player {} in {:?}", uid, path);
            } else {
                let columns: Vec<(&str, Vec<&str>)> = HISTORY_COLUMNS
                    .iter()
                    .filter_map(|column| history.column(column).map(|values| (*column, values)))
                    .collect();

                let header: Vec<String> = columns.iter().map(|(name, _)| format!("{:>14}", name)).collect();
                println!("{}", header.join(" "));
                for i in 0..history.rows.len() {
                    let line: Vec<String> = columns
                        .iter()
                        .map(|(_, values)| format!("{:>14}", values[i]))
                        .collect();
                    println!("{}", line.join(" "));
                }
                println!("\n{} rows", history.rows.len());
            }

            if let Some(path) = json {
                let text = serde_json::to_string_pretty(&history.to_json())?;
                std::fs::write(&path, text)
                    .with_context(|| format!("Failed to write history: {:?}", path))?;
            }
        }

        Commands::Summary {
            csv,
            date_format,
            json,
        } => {
            let summary = summarize_csv(&csv, &date_format)?;
            println!("First pull:  {}", summary.first_pull);
            println!("Last pull:   {}", summary.last_pull);
            println!("Total pulls: {}", summary.total_pulls);

            if let Some(path) = json {
                let text = serde_json::to_string_pretty(&summary)?;
                std::fs::write(&path, text)
                    .with_context(|| format!("Failed to write summary: {:?}", path))?;
            }
        }
    }

    Ok(())
}

fn connect(api: &ApiArgs) -> Result<WbClient> {
    WbClient::new(&api.api_base, Duration::from_secs(api.timeout))
}

fn sync(
    client: &WbClient,
    cache: &UidCache,
    output: &OutputArgs,
    data: &DataDir,
    ui: &mut impl Ui,
) -> Result<BatchReport> {
    ui.set_phase(Phase::Starting);
    ui.set_info(format!("API {}", client.base_url()));

    let uids = collect_roster(client, cache, ui)?;
    write_players(client, &uids, output, data, ui)
}

/// Normalize `uids` from `source` into the sink selected by `output`
fn write_players(
    source: &impl StatsSource,
    uids: &[String],
    output: &OutputArgs,
    data: &DataDir,
    ui: &mut impl Ui,
) -> Result<BatchReport> {
    let names = NameTable::load(output.names, output.names_file.as_deref())?;
    let normalizer = Normalizer::new(&names, run_date(&output.date_format)?);

    let target = output.sink_target(|| data.default_csv_path());
    let mut sink = target
        .open(TargetSchema::builtin(&names))
        .with_context(|| format!("Failed to open {}", target))?;
    ui.log(format!("Writing to {}", target));

    let report = run_batch(source, &normalizer, sink.as_mut(), uids, ui);

    ui.set_phase(Phase::Finalizing);
    sink.finish()
        .with_context(|| format!("Failed to finish {}", target))?;
    ui.clear_progress();

    if !report.dropped_columns.is_empty() {
        let dropped: Vec<&str> = report.dropped_columns.iter().map(String::as_str).collect();
        warn!(count = dropped.len(), "columns not in the sink were dropped");
        ui.log(format!("Dropped columns: {}", dropped.join(", ")));
    }

    Ok(report)
}

fn print_report(report: &BatchReport, start: Instant) {
    println!(
        "\n{} in {:.1}s{}",
        report.summary(),
        start.elapsed().as_secs_f64(),
        if report.stopped_early { " (stopped early)" } else { "" }
    );
    for failure in &report.failures {
        println!("  {}", failure);
    }
}

fn print_player(row: &Record) {
    let show = |column: &str| match row.get(column) {
        Some(Value::Missing) | None => "-".to_string(),
        Some(value) => value.to_string(),
    };

    println!("Name:   {}", show("Name"));
    println!("Kills:  {}", show("kills_per_weapon_total"));
    println!("Deaths: {}", show("deaths_total"));
    println!("Level:  {}", show("Level"));
    println!("XP:     {}", show("XP"));
}
