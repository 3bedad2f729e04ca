use crate::cmd::report_warnings;
use crate::output::{print_json, print_table};
use crate::settings::StoreArgs;
use clap::Args;
use gantt_core::config::FieldMap;
use gantt_core::store::AirtableStore;
use gantt_core::ResolvedFields;

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Layer the base's Config table over the local field map
    #[arg(long)]
    pub remote: bool,
}

pub fn run(store: &StoreArgs, args: FieldsArgs, json: bool) -> anyhow::Result<()> {
    let resolved = if args.remote {
        let options = store.dashboard_options()?;
        let client = AirtableStore::new(store.store_settings())?;
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(gantt_core::resolve_fields(&client, &options))
    } else {
        ResolvedFields {
            fields: store.base_fields()?,
            ..ResolvedFields::default()
        }
    };

    if json {
        return print_json(&resolved);
    }

    report_warnings(&resolved.warnings);
    let defaults = FieldMap::default();
    let rows = FieldMap::KEYS
        .iter()
        .map(|key| {
            let value = resolved.fields.get(key).unwrap_or_default().to_string();
            let source = if resolved.config.contains_key(*key) {
                "config"
            } else if value == defaults.get(key).unwrap_or_default() {
                "default"
            } else {
                "file"
            };
            vec![key.to_string(), value, source.to_string()]
        })
        .collect();
    print_table(&["KEY", "FIELD", "SOURCE"], rows);
    Ok(())
}
