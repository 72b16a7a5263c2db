use std::path::PathBuf;

use tracing::{info, instrument};

use crate::{
    api::{ReportKind, ReportSource, TIME_SPENT_COLUMN},
    config::ExportConfig,
    error::{ExportError, ExportResult},
    output::write_delimited,
    report::{
        merge::merge,
        pivot::{category_key, pivot_by_date, productivity_key},
    },
};

/// Represents the whole run: fetch, pivot, merge, write. Returns the path of the written file.
/// The two reports don't depend on each other so they are requested at the same time.
#[instrument(skip_all, fields(start = %config.range.start(), end = %config.range.end()))]
pub async fn run_export(
    config: &ExportConfig,
    source: &impl ReportSource,
) -> ExportResult<PathBuf> {
    let (overview, productivity) = tokio::try_join!(
        source.fetch_report(ReportKind::Overview, config.range),
        async {
            if config.include_productivity {
                source
                    .fetch_report(ReportKind::Productivity, config.range)
                    .await
                    .map(Some)
            } else {
                Ok::<_, ExportError>(None)
            }
        }
    )?;

    let categories = pivot_by_date(
        &overview,
        ReportKind::Overview.dimension_column(),
        TIME_SPENT_COLUMN,
        category_key(&config.labels),
        config.pivot,
    )?;
    let productivity = productivity
        .map(|report| {
            pivot_by_date(
                &report,
                ReportKind::Productivity.dimension_column(),
                TIME_SPENT_COLUMN,
                productivity_key,
                config.pivot,
            )
        })
        .transpose()?;

    let records = merge(categories, productivity);

    let path = config.output_path();
    write_delimited(&records, &path, config.delimiter)?;
    info!("Exported {} rows into {path:?}", records.len());
    Ok(path)
}
