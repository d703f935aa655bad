//! Link resolution for harvested markup
//!
//! Every URL that leaves the extraction layer goes through this module, so
//! anything that reaches an `Item` is an absolute `http`/`https` URL.

mod resolve;

pub use resolve::{is_absolute_http, parse_source_url, resolve_link, site_origin};
