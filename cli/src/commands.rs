//! Subcommand implementations; each returns the text to print

use rust_decimal::Decimal;
use serde::Serialize;
use shared::filter::evaluate_refs;
use shared::stats::item_master;
use shared::turnover::turnover_table;
use shared::{ItemTurnoverStatus, Session, SortDirection, TableFormat, TurnoverSort};

use crate::cli::{Commands, FilterArgs, InputArgs};
use crate::config::Config;
use crate::error::{AppResult, CliError};
use crate::export::{export_to_csv, export_to_json};

/// Read the input file into a fresh session with the configured initial filter
pub fn load_session(input: &InputArgs, config: &Config) -> AppResult<Session> {
    let format = input
        .format
        .or_else(|| TableFormat::from_path(&input.input))
        .ok_or_else(|| {
            CliError::invalid_argument(format!(
                "cannot tell the format of '{}', pass --format csv|json|xlsx",
                input.input.display()
            ))
        })?;

    tracing::info!(path = %input.input.display(), %format, "Loading inventory export");
    let bytes = std::fs::read(&input.input)?;

    let mut session = Session::new();
    session.ingest(format, &bytes)?;
    let initial = config.initial_filter(session.snapshot().stats());
    session.set_filter(initial);
    Ok(session)
}

fn apply_filter_flags(session: &mut Session, flags: &FilterArgs) -> AppResult<()> {
    let filter = flags.apply_to(session.filter().clone())?;
    tracing::debug!(?filter, "Active filter");
    session.set_filter(filter);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemTurnoverReport<'a> {
    item_id: &'a str,
    itr: Decimal,
    status: ItemTurnoverStatus,
}

/// Execute one subcommand
pub fn run(command: &Commands, config: &Config) -> AppResult<String> {
    match command {
        Commands::View {
            input,
            filter,
            stock_granularity,
            consumption_granularity,
            top_n,
        } => {
            let mut session = load_session(input, config)?;
            apply_filter_flags(&mut session, filter)?;

            let mut options = config.view_options();
            if let Some(granularity) = stock_granularity {
                options.stock_granularity = *granularity;
            }
            if let Some(granularity) = consumption_granularity {
                options.consumption_granularity = *granularity;
            }
            if let Some(top_n) = top_n {
                options.top_n = *top_n;
            }

            export_to_json(session.view(&options))
        }

        Commands::Turnover {
            input,
            filter,
            sort,
            asc,
            top_n,
            csv,
        } => {
            let mut session = load_session(input, config)?;
            apply_filter_flags(&mut session, filter)?;

            let direction = if *asc {
                SortDirection::Ascending
            } else if sort.is_some() {
                SortDirection::Descending
            } else {
                config.view.sort_direction
            };
            let sort = TurnoverSort::new(sort.unwrap_or(config.view.sort_key), direction);
            let top_n = top_n.unwrap_or(config.view.top_n);

            let snapshot = session.snapshot();
            let filtered = evaluate_refs(snapshot.records(), session.filter());
            let table = turnover_table(filtered, sort, top_n);
            tracing::info!(
                shown = table.rows.len(),
                total = table.total_items,
                sort = table.sort.key.as_str(),
                direction = table.sort.direction.as_str(),
                "Ranked items by turnover"
            );

            if *csv {
                export_to_csv(&table.rows)
            } else {
                export_to_json(&table)
            }
        }

        Commands::Stats { input, items, csv } => {
            let session = load_session(input, config)?;
            let snapshot = session.snapshot();

            if *items {
                let master = item_master(snapshot.records());
                if *csv {
                    export_to_csv(&master)
                } else {
                    export_to_json(&master)
                }
            } else if *csv {
                Err(CliError::invalid_argument("--csv needs --items"))
            } else {
                export_to_json(snapshot.stats())
            }
        }

        Commands::Item { input, item_id } => {
            let session = load_session(input, config)?;
            if !session
                .snapshot()
                .records()
                .iter()
                .any(|record| record.item_id == *item_id)
            {
                tracing::warn!(%item_id, "Item not present in the export");
            }
            let (itr, status) = session.item_turnover(item_id);
            export_to_json(&ItemTurnoverReport {
                item_id,
                itr,
                status,
            })
        }
    }
}
