use std::time::Duration;

use tracing::{debug, warn};

use crate::ports::outbound::{ApiResponse, HttpGateway};
use crate::shared::error::HarvestError;
use crate::shared::{Result, COMPONENT};

use super::request_executor::{Execution, RateLimitedExecutor};

/// Fixed pause between page requests. A deliberate pre-emptive throttle,
/// independent of the executor's reactive backoff, to make secondary limits
/// less likely in the first place.
const INTER_PAGE_DELAY: Duration = Duration::from_millis(500);

/// One decoded page of a listing endpoint.
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total result count, for endpoints that declare one (search-style
    /// responses). `None` for endpoints that just stream arrays.
    pub declared_total: Option<usize>,
}

/// Walk a paginated listing endpoint to exhaustion and concatenate the pages.
///
/// Pagination stops on an empty page, when the accumulated count reaches the
/// endpoint's declared total, or (for count-less endpoints) on a page shorter
/// than `page_size`. A non-success terminal response truncates the walk and
/// returns what was collected so far with a warning; partial results are
/// acceptable for this endpoint class. The one fatal path is the executor's
/// spent retry budget, which surfaces as [`HarvestError::RetryBudgetExhausted`].
///
/// A 404 is terminal but quiet: the resource's optional feature simply is not
/// there, and the (possibly empty) accumulator is returned.
pub async fn collect_all<G, T, P>(
    executor: &RateLimitedExecutor<G>,
    url: &str,
    base_query: &[(String, String)],
    page_size: usize,
    resource: &str,
    parse_page: P,
) -> Result<Vec<T>>
where
    G: HttpGateway,
    P: Fn(&ApiResponse) -> Result<Page<T>>,
{
    let mut collected: Vec<T> = Vec::new();
    let mut page_number: u32 = 1;

    loop {
        let mut query = base_query.to_vec();
        query.push(("page".to_string(), page_number.to_string()));

        let response = match executor.execute(url, &query).await? {
            Execution::Completed(response) => response,
            Execution::Exhausted { attempts } => {
                return Err(HarvestError::RetryBudgetExhausted {
                    url: url.to_string(),
                    attempts,
                }
                .into());
            }
        };

        if response.status == 404 {
            debug!(
                component = COMPONENT,
                resource, "resource not found, treating as empty"
            );
            return Ok(collected);
        }

        if !response.is_success() {
            warn!(
                component = COMPONENT,
                resource,
                status = response.status,
                page = page_number,
                collected = collected.len(),
                "pagination truncated by non-success response"
            );
            return Ok(collected);
        }

        let page = parse_page(&response).map_err(|err| HarvestError::MalformedResponse {
            url: url.to_string(),
            details: err.to_string(),
        })?;
        let page_len = page.items.len();
        collected.extend(page.items);

        if page_len == 0 {
            return Ok(collected);
        }
        if let Some(total) = page.declared_total {
            // Known to under-collect if the upstream total grows mid-walk.
            if collected.len() >= total {
                return Ok(collected);
            }
        } else if page_len < page_size {
            return Ok(collected);
        }

        page_number += 1;
        tokio::time::sleep(INTER_PAGE_DELAY).await;
    }
}
