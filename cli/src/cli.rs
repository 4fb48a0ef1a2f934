//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shared::{
    parse_calendar_date, AbcClass, FilterState, Granularity, Selection, TableFormat,
    TurnoverSortKey,
};

use crate::error::{AppResult, CliError};

#[derive(Parser, Debug)]
#[command(name = "inv-dash")]
#[command(about = "Inventory analytics over CSV, JSON and Excel exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every dashboard surface for the filtered data as JSON
    View {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Stock trend bucket size: daily or monthly
        #[arg(long)]
        stock_granularity: Option<Granularity>,

        /// Consumption trend bucket size: daily or monthly
        #[arg(long)]
        consumption_granularity: Option<Granularity>,

        /// Rows kept in the turnover table
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Print the ranked inventory turnover table
    Turnover {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Sort column, e.g. itr, itemName, consumptionValue
        #[arg(short, long)]
        sort: Option<TurnoverSortKey>,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Rows to print
        #[arg(long)]
        top_n: Option<usize>,

        /// Print CSV rows instead of JSON
        #[arg(long)]
        csv: bool,
    },

    /// Print summary statistics of the whole dataset
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Print the item master list instead
        #[arg(long)]
        items: bool,

        /// Print CSV rows instead of JSON (item master only)
        #[arg(long)]
        csv: bool,
    },

    /// Print one item's turnover over its whole history
    Item {
        #[command(flatten)]
        input: InputArgs,

        /// Item ID to look up
        item_id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// CSV, JSON or Excel (.xlsx/.xls) inventory export
    #[arg(short, long)]
    pub input: PathBuf,

    /// Table format; guessed from the file extension when omitted
    #[arg(short, long)]
    pub format: Option<TableFormat>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive item name substring
    #[arg(long)]
    pub item_name: Option<String>,

    /// ABC class (A, B, C) or "all"
    #[arg(long)]
    pub abc_class: Option<String>,

    /// Category or "all"
    #[arg(long)]
    pub category: Option<String>,

    /// Earliest date, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,

    /// Latest date, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,

    /// Ignore the date bounds seeded from the data
    #[arg(long)]
    pub all_dates: bool,
}

impl FilterArgs {
    /// Layer the flags over `base`; unset flags leave `base` untouched
    pub fn apply_to(&self, base: FilterState) -> AppResult<FilterState> {
        let mut filter = base;

        if let Some(item_name) = &self.item_name {
            filter.item_name = item_name.trim().to_string();
        }
        if let Some(abc_class) = &self.abc_class {
            filter.abc_class = abc_class
                .parse::<Selection<AbcClass>>()
                .map_err(CliError::InvalidArgument)?;
        }
        if let Some(category) = &self.category {
            filter.category = category
                .parse::<Selection<String>>()
                .map_err(CliError::InvalidArgument)?;
        }
        if self.all_dates {
            filter.date_range.from = None;
            filter.date_range.to = None;
        }
        if let Some(from) = &self.from {
            filter.date_range.from = Some(parse_date_flag("from", from)?);
        }
        if let Some(to) = &self.to {
            filter.date_range.to = Some(parse_date_flag("to", to)?);
        }

        Ok(filter)
    }
}

fn parse_date_flag(flag: &str, value: &str) -> AppResult<chrono::NaiveDate> {
    parse_calendar_date(value)
        .ok_or_else(|| CliError::invalid_argument(format!("--{} expects YYYY-MM-DD, got '{}'", flag, value)))
}
