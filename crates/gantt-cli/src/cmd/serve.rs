use crate::settings::StoreArgs;
use clap::Args;
use gantt_server::state::{AppState, DEFAULT_REQUEST_TIMEOUT};
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (0 = OS-assigned)
    #[arg(long, env = "GANTT_PORT", default_value = "3141")]
    pub port: u16,

    /// Upper bound on one dashboard aggregation, in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout: u64,
}

pub fn run(store: &StoreArgs, args: ServeArgs) -> anyhow::Result<()> {
    let options = store.dashboard_options()?;
    let state = AppState::new(store.store_settings(), options)?
        .with_request_timeout(Duration::from_secs(args.request_timeout));

    tracing::info!(
        base = %state.store.settings().base_id,
        director_view = %state.options.director_view,
        "starting dashboard API"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(gantt_server::serve(state, args.port))
}
