use crate::cmd::{fetch_dashboard, report_warnings};
use crate::output::{print_json, print_table};
use crate::settings::StoreArgs;

pub fn run(store: &StoreArgs, json: bool) -> anyhow::Result<()> {
    let dashboard = fetch_dashboard(store)?;

    if json {
        return print_json(&dashboard);
    }

    report_warnings(&dashboard.warnings);
    let rows = vec![
        vec!["Milestones".to_string(), dashboard.milestones.len().to_string()],
        vec![
            "Director View actions".to_string(),
            format!("{} of {}", dashboard.actions.len(), dashboard.all_actions_count),
        ],
        vec!["People".to_string(), dashboard.people_map.len().to_string()],
        vec!["Priorities".to_string(), dashboard.priorities_map.len().to_string()],
        vec!["Notes".to_string(), dashboard.notes_map.len().to_string()],
        vec!["Config rows".to_string(), dashboard.config.len().to_string()],
    ];
    print_table(&["TABLE", "COUNT"], rows);
    Ok(())
}
