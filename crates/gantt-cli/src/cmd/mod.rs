pub mod actions;
pub mod dashboard;
pub mod fields;
pub mod gantt;
pub mod serve;

use crate::settings::StoreArgs;
use gantt_core::store::AirtableStore;
use gantt_core::Dashboard;

/// Run one aggregation against the configured record store.
pub fn fetch_dashboard(args: &StoreArgs) -> anyhow::Result<Dashboard> {
    let options = args.dashboard_options()?;
    let store = AirtableStore::new(args.store_settings())?;
    let rt = tokio::runtime::Runtime::new()?;
    let dashboard = rt.block_on(gantt_core::aggregate(&store, &options))?;
    Ok(dashboard)
}

/// Config warnings go to stderr so `--json` output stays parseable.
pub fn report_warnings(warnings: &[gantt_core::config::ConfigWarning]) {
    for w in warnings {
        eprintln!("warning: {}", w.message);
    }
}
