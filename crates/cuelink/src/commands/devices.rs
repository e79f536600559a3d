//! Device command handlers.

use std::num::NonZeroU64;
use std::str::FromStr;

use serde_json::{Value, json};

use cuelink_api::{
    CueClient, Filter, FilterBuilder, GetAllApsParams, ListApsParams, LogicalOperator,
};

use crate::cli::{DevicesArgs, DevicesCommand, FilterOpts, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::ensure_session;

pub async fn handle(
    client: &mut CueClient,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ensure_session(client).await?;

    match args.command {
        DevicesCommand::List(list) => {
            let params = ListApsParams {
                start_index: list.startindex,
                page_size: list.pagesize,
                total_count_required: list.total_count,
                location_id: list.location_id,
                sort_by: list.sortby.clone(),
                ascending: !list.descending,
                filters: build_filters(&list.filter)?,
                extra: simple_filters(&list.filter),
                ..ListApsParams::default()
            };

            let page = client.managed_devices().list_aps(&params).await?;
            let out = output::render_devices(&global.output, &page, &page.managed_devices);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::FetchAll(fetch) => {
            let params = GetAllApsParams {
                page_size: fetch.pagesize,
                max_pages: fetch.max_pages.and_then(NonZeroU64::new),
                filters: build_filters(&fetch.filter)?,
                extra: simple_filters(&fetch.filter),
            };

            let all = client.managed_devices().get_all_aps(&params).await?;
            let out = if fetch.count {
                format!("Total devices: {}", all.len())
            } else {
                output::render_devices(&global.output, &all, &all)
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Parse `--filter property:operator:value` strings into a builder.
fn build_filters(opts: &FilterOpts) -> Result<Option<FilterBuilder>, CliError> {
    if opts.filters.is_empty() {
        return Ok(None);
    }

    let operator = LogicalOperator::from_str(&opts.filter_operator)?;
    let mut builder = FilterBuilder::new(operator);
    for raw in &opts.filters {
        let mut parts = raw.splitn(3, ':');
        let (Some(property), Some(op), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CliError::InvalidFilter { filter: raw.clone() });
        };
        let filter = Filter::parse(property, op, value).map_err(|_| CliError::InvalidFilter {
            filter: raw.clone(),
        })?;
        builder.push(filter);
    }
    Ok(Some(builder))
}

/// Turn the simple filter flags into extra query parameters.
fn simple_filters(opts: &FilterOpts) -> Vec<(String, Value)> {
    let mut extra = Vec::new();
    if let Some(active) = opts.active {
        extra.push(("active".to_owned(), json!(active)));
    }
    if !opts.model.is_empty() {
        extra.push(("model".to_owned(), json!(opts.model)));
    }
    if !opts.name.is_empty() {
        extra.push(("name".to_owned(), json!(opts.name)));
    }
    extra
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::FilterOpts;

    fn opts(filters: Vec<&str>, operator: &str) -> FilterOpts {
        FilterOpts {
            active: None,
            model: Vec::new(),
            name: Vec::new(),
            filters: filters.into_iter().map(str::to_owned).collect(),
            filter_operator: operator.to_owned(),
        }
    }

    #[test]
    fn filter_strings_parse_into_builder() {
        let fb = build_filters(&opts(
            vec!["name:contains:Arista", "boxid:greaterThan:10"],
            "OR",
        ))
        .unwrap()
        .unwrap();

        assert_eq!(fb.len(), 2);
        assert_eq!(fb.operator(), LogicalOperator::Or);
        assert_eq!(
            fb.filters()[0].to_string(),
            r#"{"property":"name","operator":"contains","value":["Arista"]}"#
        );
    }

    #[test]
    fn value_may_itself_contain_colons() {
        let fb = build_filters(&opts(vec!["macaddress:equals:aa:bb:cc"], "AND"))
            .unwrap()
            .unwrap();
        assert_eq!(fb.filters()[0].value(), &[serde_json::json!("aa:bb:cc")]);
    }

    #[test]
    fn malformed_filter_strings_are_rejected() {
        assert!(matches!(
            build_filters(&opts(vec!["name-only"], "AND")),
            Err(CliError::InvalidFilter { .. })
        ));
        assert!(matches!(
            build_filters(&opts(vec!["name:matches:x"], "AND")),
            Err(CliError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn simple_flags_become_extra_params() {
        let mut o = opts(Vec::new(), "AND");
        o.active = Some(true);
        o.model = vec!["AP-555".into(), "AP-635".into()];

        let extra = simple_filters(&o);
        assert_eq!(extra.len(), 2);
        assert_eq!(extra[0], ("active".to_owned(), json!(true)));
        assert_eq!(extra[1], ("model".to_owned(), json!(["AP-555", "AP-635"])));
    }
}
