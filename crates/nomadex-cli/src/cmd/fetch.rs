//! Fetch subcommand - query samples, resolve authors, export artifacts.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use nomadex_api::{
    Credentials, EntryQuery, NomadClient, enrich_from_uploads, query_all_with_progress,
    resolve_names_with_progress, unique_authors,
};
use nomadex_report::{
    SummaryStats, author_statistics, join, network_graph, time_series, write_csv, write_json,
};

use crate::config::Config;
use crate::progress;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// ELN section type to filter by (default from config)
    #[arg(short, long)]
    pub section: Option<String>,

    /// Entry type filter, added as an extra query clause
    #[arg(long)]
    pub entry_type: Option<String>,

    /// Records per page
    #[arg(short, long)]
    pub page_size: Option<usize>,

    /// Maximum number of pages to fetch (omit to fetch everything)
    #[arg(short, long)]
    pub max_pages: Option<usize>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Backfill author fields from upload metadata where entries lack them
    #[arg(long)]
    pub enrich_uploads: bool,
}

pub fn run(args: FetchArgs, config: &Config) -> Result<()> {
    let credentials = Credentials::from_env().context(
        "no credentials: set NOMAD_CLIENT_ACCESS_TOKEN, or NOMAD_USERNAME and NOMAD_PASSWORD",
    )?;
    let base_url = config.api.resolved_base_url()?;
    let client = NomadClient::new(&base_url, &credentials)?;
    log::info!("connected to {base_url}");

    let section = args
        .section
        .unwrap_or_else(|| config.query.section_type.clone());
    let mut query = EntryQuery::new().section(&section).quantity("data");
    if let Some(entry_type) = &args.entry_type {
        query = query.entry_type(entry_type);
    }
    let page_size = args.page_size.unwrap_or(config.query.page_size);

    let bar = progress::fetch_bar();
    let mut records = query_all_with_progress(&client, &query, page_size, args.max_pages, &bar)?;
    bar.finish_and_clear();
    log::info!("fetched {} records", records.len());

    if args.enrich_uploads {
        let enriched = enrich_from_uploads(&client, &mut records)?;
        log::info!("enriched {enriched} records from upload metadata");
    }

    let authors = unique_authors(&records);
    log::info!("resolving {} unique authors", authors.len());
    let bar = progress::count_bar(authors.len() as u64, "resolving authors");
    let names = resolve_names_with_progress(&client, &authors, &bar);
    bar.finish_and_clear();

    let out_dir = args.output.unwrap_or_else(|| config.output.dir.clone());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;

    let rows = join(&records, &names);
    write_csv(&out_dir.join("samples_with_authors.csv"), &rows)?;

    let summary = SummaryStats::compute(&records, &names);
    write_json(&out_dir.join("summary_statistics.json"), &summary)?;
    write_json(&out_dir.join("time_series.json"), &time_series(&records))?;
    write_json(
        &out_dir.join("author_statistics.json"),
        &author_statistics(&records, &names),
    )?;
    write_json(
        &out_dir.join("network_graph.json"),
        &network_graph(&records, &names),
    )?;
    log::info!("wrote 5 artifacts to {}", out_dir.display());

    if std::io::stderr().is_terminal() {
        eprintln!("{}", summary.format_table());
    } else {
        summary.log();
    }

    Ok(())
}
