//! Where pages come from

use std::time::Duration;

use drillbox_core::{FetchError, HttpResponse};

/// One page fetch. Implementations return non-success statuses as
/// responses and reserve `Err` for transport failures.
pub trait PageSource {
    fn fetch(&mut self, page: u32, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

impl<S: PageSource + ?Sized> PageSource for &mut S {
    fn fetch(&mut self, page: u32, timeout: Duration) -> Result<HttpResponse, FetchError> {
        (**self).fetch(page, timeout)
    }
}

/// Live source: GET `<base_url><page>`
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    base_url: String,
}

impl HttpPageSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn page_url(&self, page: u32) -> String {
        format!("{}{page}", self.base_url)
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&mut self, page: u32, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let url = self.page_url(page);
        log::debug!("GET {url}");
        drillbox_core::get(&url, timeout)
    }
}
