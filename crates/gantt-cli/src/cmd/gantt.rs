use crate::cmd::{fetch_dashboard, report_warnings};
use crate::output::{date_cell, print_json, print_table, render_bar};
use crate::settings::StoreArgs;
use chrono::NaiveDate;
use clap::Args;
use gantt_core::view::{GanttQuery, GanttRow, GanttView};

#[derive(Args, Debug)]
pub struct GanttArgs {
    /// Only these priorities (repeat the flag for several)
    #[arg(long)]
    pub priority: Option<Vec<String>>,

    /// Only these statuses (repeat the flag for several)
    #[arg(long)]
    pub status: Option<Vec<String>>,

    /// Only these accountable people (repeat the flag for several)
    #[arg(long)]
    pub accountable: Option<Vec<String>>,

    /// List milestones without priority groups
    #[arg(long)]
    pub flat: bool,

    /// Order by deadline, undated milestones last
    #[arg(long)]
    pub sort_deadline: bool,

    /// Anchor date for the fallback window when nothing has a deadline
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    /// Timeline width in characters
    #[arg(long, default_value_t = 48)]
    pub width: usize,
}

impl GanttArgs {
    pub fn query(&self) -> GanttQuery {
        GanttQuery {
            priorities: self.priority.clone(),
            statuses: self.status.clone(),
            accountable: self.accountable.clone(),
            group_by_priority: !self.flat,
            sort_by_deadline: self.sort_deadline,
        }
    }
}

pub fn run(store: &StoreArgs, args: GanttArgs, json: bool) -> anyhow::Result<()> {
    let dashboard = fetch_dashboard(store)?;
    let today = args.today.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let view = GanttView::build(&dashboard, &args.query(), today);

    if json {
        return print_json(&view);
    }

    report_warnings(&dashboard.warnings);
    let first = view.bounds.months.first().map(|m| m.label.as_str()).unwrap_or("-");
    let last = view.bounds.months.last().map(|m| m.label.as_str()).unwrap_or("-");
    println!(
        "{first} .. {last} ({} months), {} of {} milestones",
        view.bounds.months.len(),
        view.shown,
        view.total
    );
    println!();

    let mut rows = Vec::new();
    for group in &view.groups {
        let label = group.key.clone().unwrap_or_default();
        for row in &group.items {
            rows.push(table_row(&label, row, args.width));
        }
    }
    if rows.is_empty() {
        println!("No milestones match the current filters.");
        return Ok(());
    }
    print_table(
        &["PRIORITY", "MILESTONE", "STATUS", "ACCOUNTABLE", "START", "DEADLINE", "TIMELINE"],
        rows,
    );
    Ok(())
}

fn table_row(group: &str, row: &GanttRow, width: usize) -> Vec<String> {
    let m = &row.milestone;
    let start = match (m.start_date, m.has_start_date) {
        (Some(d), false) => format!("{d} (est)"),
        (d, _) => date_cell(d),
    };
    vec![
        group.to_string(),
        m.name.clone(),
        m.status.clone(),
        m.accountable.clone(),
        start,
        date_cell(m.deadline),
        render_bar(row.geometry.as_ref(), width),
    ]
}
