//! Chart handler: fetch the four series over the trailing window.

use std::fmt::Write;

use serde::Serialize;
use tabled::Tabled;

use paydesk_core::{ChartKey, ChartPoint, ChartSeries, Dashboard};

use crate::cli::{ChartsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&ChartPoint> for PointRow {
    fn from(p: &ChartPoint) -> Self {
        Self {
            label: p.name.clone(),
            value: format_value(p.value),
        }
    }
}

#[derive(Serialize)]
struct ChartView {
    chart: ChartKey,
    points: ChartSeries,
}

fn format_value(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        output::amount(value)
    } else {
        format!("{value:.2}")
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: &ChartsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    dashboard.fetch_charts().await?;
    let bundle = dashboard.store().charts();
    let color = output::should_color(&global.color);

    let keys = args.key.map_or_else(|| ChartKey::ALL.to_vec(), |k| vec![k]);
    let views: Vec<ChartView> = keys
        .into_iter()
        .map(|chart| ChartView {
            chart,
            points: bundle.get(chart).clone(),
        })
        .collect();

    let out = output::render_single(&global.output, views.as_slice(), |views| {
        let mut s = String::new();
        for (i, view) in views.iter().enumerate() {
            if i > 0 {
                s.push('\n');
            }
            let _ = writeln!(s, "{}", output::heading(view.chart.as_str(), color));
            if view.points.is_empty() {
                let _ = writeln!(s, "(no data)");
            } else {
                let rows: Vec<PointRow> = view.points.iter().map(PointRow::from).collect();
                let _ = writeln!(s, "{}", output::render_table(&rows));
            }
        }
        s.trim_end().to_owned()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
