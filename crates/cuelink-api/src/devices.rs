// Managed device (access point) endpoints.
//
// One page fetch against /manageddevices/aps plus a full-pagination
// fetch that folds every page into a single collection. Filter output
// from the filter module merges into the query string here.

use std::num::NonZeroU64;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::CueClient;
use crate::error::Error;
use crate::filter::FilterBuilder;

/// Path of the paged AP listing endpoint.
pub const AP_LIST_PATH: &str = "/manageddevices/aps";

/// The endpoint requires this exact API version header.
const AP_LIST_VERSION: &str = "19";

// ── Response types ───────────────────────────────────────────────────

/// One managed device record.
///
/// The API returns dozens of fields per AP and the set varies by
/// firmware; the commonly needed ones are modeled explicitly and the
/// rest land in `extra` untouched. Nothing is validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macaddress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipaddress: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxid: Option<i64>,
    /// Catch-all for everything the API sends beyond the modeled fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One page of the AP listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApPage {
    #[serde(default, rename = "managedDevices")]
    pub managed_devices: Vec<Ap>,
    /// Populated only when the request asked for a total count.
    #[serde(
        default,
        rename = "totalCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_count: Option<u64>,
    #[serde(
        default,
        rename = "pagingSessionId",
        skip_serializing_if = "Option::is_none"
    )]
    pub paging_session_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Request parameters ───────────────────────────────────────────────

/// Parameters for a single [`ManagedDevices::list_aps`] page fetch.
#[derive(Debug, Clone)]
pub struct ListApsParams {
    /// Start index of the requested page (default 0).
    pub start_index: u64,
    /// Page size (default 10).
    pub page_size: u64,
    /// Ask the API to populate `totalCount` (default false).
    pub total_count_required: bool,
    /// Restrict the listing to one location.
    pub location_id: Option<i64>,
    /// Sort column (default "boxid").
    pub sort_by: String,
    /// Ascending sort order (default true).
    pub ascending: bool,
    /// Fetch radio information (default true).
    pub fetch_radios: bool,
    /// Populate mesh link information (default false).
    pub populate_mesh_info: bool,
    /// Populate wired interface information (default false).
    pub populate_wired_interfaces: bool,
    /// Structured filters; contributes `operator` + `filter` params.
    pub filters: Option<FilterBuilder>,
    /// Extra scalar or sequence query parameters (`active=true`,
    /// `model=AP-555&model=AP-635`, ...). Sequences repeat the key.
    pub extra: Vec<(String, Value)>,
}

impl Default for ListApsParams {
    fn default() -> Self {
        Self {
            start_index: 0,
            page_size: 10,
            total_count_required: false,
            location_id: None,
            sort_by: "boxid".to_owned(),
            ascending: true,
            fetch_radios: true,
            populate_mesh_info: false,
            populate_wired_interfaces: false,
            filters: None,
            extra: Vec::new(),
        }
    }
}

impl ListApsParams {
    fn query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("startindex".to_owned(), self.start_index.to_string()),
            ("pagesize".to_owned(), self.page_size.to_string()),
            (
                "totalcountrequired".to_owned(),
                self.total_count_required.to_string(),
            ),
            ("sortby".to_owned(), self.sort_by.clone()),
            ("ascending".to_owned(), self.ascending.to_string()),
            ("fetchradios".to_owned(), self.fetch_radios.to_string()),
            (
                "populatemeshinfo".to_owned(),
                self.populate_mesh_info.to_string(),
            ),
            (
                "populatewiredinterfaces".to_owned(),
                self.populate_wired_interfaces.to_string(),
            ),
        ];
        if let Some(location_id) = self.location_id {
            query.push(("locationid".to_owned(), location_id.to_string()));
        }
        if let Some(ref filters) = self.filters {
            query.extend(filters.to_query_params());
        }
        for (key, value) in &self.extra {
            push_query_value(&mut query, key, value);
        }
        query
    }
}

/// Parameters for [`ManagedDevices::get_all_aps`].
#[derive(Debug, Clone)]
pub struct GetAllApsParams {
    /// Items fetched per request (default 100).
    pub page_size: u64,
    /// Abort with [`Error::PageLimit`] after this many pages. `None`
    /// (the default) trusts the server and iterates unbounded.
    pub max_pages: Option<NonZeroU64>,
    pub filters: Option<FilterBuilder>,
    pub extra: Vec<(String, Value)>,
}

impl Default for GetAllApsParams {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_pages: None,
            filters: None,
            extra: Vec::new(),
        }
    }
}

fn push_query_value(query: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                query.push((key.to_owned(), scalar_string(item)));
            }
        }
        scalar => query.push((key.to_owned(), scalar_string(scalar))),
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Resource ─────────────────────────────────────────────────────────

/// Managed device operations, borrowed from a [`CueClient`].
///
/// Obtained via [`CueClient::managed_devices`].
pub struct ManagedDevices<'a> {
    client: &'a CueClient,
}

impl<'a> ManagedDevices<'a> {
    pub(crate) fn new(client: &'a CueClient) -> Self {
        Self { client }
    }

    /// Fetch one page of the AP listing.
    ///
    /// `GET /manageddevices/aps` with the required `Version: 19` header,
    /// merging pagination, sort, and feature-flag parameters with any
    /// filters and extra query parameters.
    pub async fn list_aps(&self, params: &ListApsParams) -> Result<ApPage, Error> {
        let query = params.query();
        let value = self
            .client
            .send(
                Method::GET,
                AP_LIST_PATH,
                &query,
                None,
                &[("Version", AP_LIST_VERSION)],
            )
            .await?;

        serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: value.to_string(),
        })
    }

    /// Fetch every AP across all pages.
    ///
    /// Starts at index 0 and advances by `page_size` per request,
    /// concatenating items in fetch order. A page shorter than
    /// `page_size` (zero included) is the termination signal, so an
    /// exactly-full final page costs one extra trailing request. With
    /// `max_pages` unset, a server that always returns full pages loops
    /// forever — set the cap when the server isn't trusted.
    pub async fn get_all_aps(&self, params: &GetAllApsParams) -> Result<Vec<Ap>, Error> {
        let mut all = Vec::new();
        let mut start_index = 0u64;
        let mut pages = 0u64;

        loop {
            if let Some(cap) = params.max_pages {
                if pages >= cap.get() {
                    return Err(Error::PageLimit { pages });
                }
            }

            let page_params = ListApsParams {
                start_index,
                page_size: params.page_size,
                filters: params.filters.clone(),
                extra: params.extra.clone(),
                ..ListApsParams::default()
            };
            let page = self.list_aps(&page_params).await?;
            pages += 1;

            let fetched = page.managed_devices.len() as u64;
            debug!(start_index, fetched, "fetched AP page");
            all.extend(page.managed_devices);

            if fetched < params.page_size {
                break;
            }
            start_index += params.page_size;
        }

        Ok(all)
    }
}
