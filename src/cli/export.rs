use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::{Parser, ValueEnum};
use tracing::debug;

use crate::{
    api::{RescueTimeClient, DEFAULT_API_URL},
    config::ExportConfig,
    error::{ExportError, ExportResult},
    output::Delimiter,
    pipeline::run_export,
    report::{
        labels::{CategoryLabels, UnmappedPolicy},
        pivot::{CombinePolicy, Granularity, PivotOptions},
    },
    utils::time::{parse_day, DateRange},
};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum DateStyle {
    #[default]
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum GroupBy {
    /// One row per `Date` value sent by the service
    #[default]
    Verbatim,
    /// One row per calendar day
    Day,
}

impl From<GroupBy> for Granularity {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Verbatim => Self::Verbatim,
            GroupBy::Day => Self::Day,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Combine {
    /// Keep the last value
    Overwrite,
    /// Add values together
    Sum,
}

impl From<Combine> for CombinePolicy {
    fn from(value: Combine) -> Self {
        match value {
            Combine::Overwrite => Self::Overwrite,
            Combine::Sum => Self::Sum,
        }
    }
}

#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[arg(long, env = "RESCUETIME_API_KEY", hide_env_values = true, help = "RescueTime API key")]
    pub key: Option<String>,
    #[arg(
        long = "start",
        short,
        env = "RESCUETIME_START_DATE",
        help = "First day of the report. Examples are \"2020-09-01\", \"yesterday\", \"15/03/2025\""
    )]
    pub start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        env = "RESCUETIME_END_DATE",
        help = "Last day of the report, inclusive. Accepts the same values as --start"
    )]
    pub end_date: Option<String>,
    #[arg(long, value_enum, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    pub date_style: DateStyle,
    #[arg(
        long = "out-dir",
        short,
        env = "RESCUETIME_OUT_DIR",
        default_value = "./output",
        help = "Directory the report is written into. Created if missing"
    )]
    pub out_dir: PathBuf,
    #[arg(long = "api-url", env = "RESCUETIME_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
    #[arg(long, help = "Json file mapping category names to column names, e.g. {\"Business\": \"business\"}")]
    pub labels: Option<PathBuf>,
    #[arg(long = "strict-labels", help = "Fail on categories that have no label instead of using their name")]
    pub strict_labels: bool,
    #[arg(long = "no-productivity", help = "Skip the productivity report and its Score columns")]
    pub no_productivity: bool,
    #[arg(long = "group-by", value_enum, default_value_t = GroupBy::Verbatim)]
    pub group_by: GroupBy,
    #[arg(
        long,
        value_enum,
        help = "What to do when a column appears twice for the same row. Defaults to sum with --group-by day and to overwrite otherwise"
    )]
    pub combine: Option<Combine>,
    #[arg(long, help = "Write tab separated values instead of comma separated")]
    pub tsv: bool,
    #[arg(long, help = "Timeout of each request in seconds. No timeout by default")]
    pub timeout: Option<u64>,
}

/// Command to export a report. Fetches both reports, reshapes them and writes the table, then
/// prints the path of the written file.
pub async fn process_export_command(args: ExportArgs) -> Result<()> {
    // Configuration problems have to surface before anything touches the network.
    let config = build_config(args, Local::now())?;
    debug!("Running export with {config:?}");

    let client = RescueTimeClient::new(&config.api_url, &config.api_key, config.timeout)?;
    let path = run_export(&config, &client).await?;
    println!("{}", path.display());
    Ok(())
}

/// Validates arguments and turns them into an [ExportConfig].
pub fn build_config(
    ExportArgs {
        key,
        start_date,
        end_date,
        date_style,
        out_dir,
        api_url,
        labels,
        strict_labels,
        no_productivity,
        group_by,
        combine,
        tsv,
        timeout,
    }: ExportArgs,
    now: DateTime<Local>,
) -> ExportResult<ExportConfig> {
    let Some(api_key) = key.filter(|v| !v.trim().is_empty()) else {
        return Err(ExportError::config(
            "api key is missing, set RESCUETIME_API_KEY or pass --key",
        ));
    };
    let dialect: chrono_english::Dialect = date_style.into();
    let Some(start) = start_date else {
        return Err(ExportError::config(
            "start date is missing, set RESCUETIME_START_DATE or pass --start",
        ));
    };
    let Some(end) = end_date else {
        return Err(ExportError::config(
            "end date is missing, set RESCUETIME_END_DATE or pass --end",
        ));
    };
    let range = DateRange::new(
        parse_day(&start, now, dialect)?,
        parse_day(&end, now, dialect)?,
    )?;

    let unmapped = if strict_labels {
        UnmappedPolicy::Strict
    } else {
        UnmappedPolicy::PassThrough
    };
    let labels = match labels {
        Some(path) => CategoryLabels::from_json_file(&path, unmapped)?,
        None => CategoryLabels::default().with_unmapped(unmapped),
    };

    let granularity: Granularity = group_by.into();
    // Day grouping folds many hourly rows into one, so they are summed unless asked otherwise.
    let combine = combine.map(CombinePolicy::from).unwrap_or(match granularity {
        Granularity::Day => CombinePolicy::Sum,
        Granularity::Verbatim => CombinePolicy::Overwrite,
    });

    Ok(ExportConfig {
        api_key,
        api_url,
        range,
        out_dir,
        labels,
        include_productivity: !no_productivity,
        pivot: PivotOptions {
            granularity,
            combine,
        },
        delimiter: if tsv { Delimiter::Tab } else { Delimiter::Comma },
        timeout: timeout.map(Duration::from_secs),
    })
}
