//! Route handlers and shared request/response shapes.

pub mod deliveries;
pub mod health;
pub mod metrics;
pub mod preparations;

use app::KitchenService;
use serde::Serialize;
use store::Page;

/// Shared application state accessible from all handlers.
pub struct AppState<P, D> {
    pub service: KitchenService<P, D>,
}

/// One page of a listing plus the pagination envelope.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> PagedResponse<T> {
    /// Wraps a store page in the wire envelope.
    pub fn from_page<U>(
        page: Page<U>,
        page_number: u32,
        page_size: u32,
        map: impl Fn(&U) -> T,
    ) -> Self {
        let total_pages = page.total_pages(page_size);
        Self {
            items: page.items.iter().map(map).collect(),
            total_count: page.total_count,
            page_number,
            page_size,
            total_pages,
        }
    }
}
