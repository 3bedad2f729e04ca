use crate::cmd::{fetch_dashboard, report_warnings};
use crate::output::{date_cell, print_json, print_table};
use crate::settings::StoreArgs;
use clap::{Args, ValueEnum};
use gantt_core::model::Category;
use gantt_core::view::{ActionsQuery, ActionsView};

const NOTE_PREVIEW_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionGroup {
    Responsible,
    Status,
    None,
}

#[derive(Args, Debug)]
pub struct ActionsArgs {
    /// Only these responsible people (repeat the flag for several)
    #[arg(long)]
    pub responsible: Option<Vec<String>>,

    /// Only these statuses (repeat the flag for several)
    #[arg(long)]
    pub status: Option<Vec<String>>,

    /// How to group the list
    #[arg(long, value_enum, default_value_t = ActionGroup::Responsible)]
    pub group: ActionGroup,

    /// Print full notes under each action
    #[arg(long)]
    pub notes: bool,
}

impl ActionsArgs {
    pub fn query(&self) -> ActionsQuery {
        ActionsQuery {
            responsible: self.responsible.clone(),
            statuses: self.status.clone(),
            group: match self.group {
                ActionGroup::Responsible => Some(Category::Responsible),
                ActionGroup::Status => Some(Category::Status),
                ActionGroup::None => None,
            },
        }
    }
}

pub fn run(store: &StoreArgs, args: ActionsArgs, json: bool) -> anyhow::Result<()> {
    let dashboard = fetch_dashboard(store)?;
    let view = ActionsView::build(&dashboard, &args.query());

    if json {
        return print_json(&view);
    }

    report_warnings(&dashboard.warnings);
    if view.shown == 0 {
        println!("No Director View actions match the current filters.");
        return Ok(());
    }

    if args.notes {
        for group in &view.groups {
            if let Some(key) = &group.key {
                println!("== {key} ==");
            }
            for a in &group.items {
                println!("{}  [{}]  due {}", a.name, a.status, date_cell(a.deadline));
                if let Some(notes) = &a.notes {
                    for line in notes.lines() {
                        println!("    {line}");
                    }
                }
            }
            println!();
        }
        return Ok(());
    }

    let mut rows = Vec::new();
    for group in &view.groups {
        let label = group.key.clone().unwrap_or_default();
        for a in &group.items {
            rows.push(vec![
                label.clone(),
                a.name.clone(),
                a.responsible.clone(),
                a.status.clone(),
                date_cell(a.deadline),
                a.notes.as_deref().map(note_preview).unwrap_or_default(),
            ]);
        }
    }
    print_table(
        &["GROUP", "ACTION", "RESPONSIBLE", "STATUS", "DEADLINE", "NOTES"],
        rows,
    );
    Ok(())
}

/// First line of `notes`, cut to `NOTE_PREVIEW_CHARS`.
fn note_preview(notes: &str) -> String {
    let first = notes.lines().next().unwrap_or_default();
    if first.chars().count() <= NOTE_PREVIEW_CHARS {
        return first.to_string();
    }
    let cut: String = first.chars().take(NOTE_PREVIEW_CHARS - 3).collect();
    format!("{cut}...")
}
