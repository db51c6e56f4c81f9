mod cli;
mod report;

use crate::cli::{Args, RunConfig};
use clap::Parser;
use database::{DatabaseLoader, DatabaseProvider, SuggestionWriter};
use engine::{
    run_timestamp, DataProvider, FileLeafStore, OptimizerError, ResultSelector, SearchContext, SquadState,
    StrategyTreeSearch, TransferSuggestion,
};
use env_logger::Env;
use log::info;
use std::time::Instant;

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = RunConfig::load(&args)?;
    let settings = &config.optimization;
    settings.validate()?;

    let started = Instant::now();
    let data = DatabaseLoader::load(&config.data_dir)?;
    info!("database loaded: {} ms", started.elapsed().as_millis());

    let provider = DatabaseProvider::new(data, &settings.season);

    let starting_squad = SquadState::from_transactions(&provider.transactions(), &provider, settings.starting_budget);
    if !starting_squad.is_complete() {
        return Err(OptimizerError::IncompleteSquad(starting_squad.len()).into());
    }

    let first_gameweek = settings.first_gameweek();
    let free_transfers = settings
        .free_transfers
        .unwrap_or_else(|| provider.free_transfers(first_gameweek));
    info!("{} free transfers going into gw {}", free_transfers, first_gameweek);

    let ctx = SearchContext::new(&provider, settings);
    let store = FileLeafStore::new(&config.leaf_dir)?;

    let summary = StrategyTreeSearch::new(ctx, &store).run(starting_squad.clone(), free_transfers)?;
    info!("search finished: {} strategies in {} s", summary.leaves, summary.elapsed.as_secs());

    let selection = ResultSelector::select(&store, &settings.tag, settings.gameweeks.len())?;

    report::log_strategy(&selection, &provider);
    report::log_next_lineup(&starting_squad, &selection.best, &provider, first_gameweek, &settings.tag)?;

    let suggestions = TransferSuggestion::from_strategy(
        &selection.best,
        selection.points_gain(),
        &settings.tag,
        &settings.season,
        &run_timestamp(),
    );
    SuggestionWriter::new(&config.output).write(&suggestions)?;

    Ok(())
}
