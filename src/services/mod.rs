//! Service layer for the bot.
//!
//! This module contains the business logic for:
//! - Keyword extraction (`KeywordExtractor`)
//! - Catalog search (`CatalogSearchClient`)
//! - Detail page resolution (`CatalogDetailResolver`)
//! - Keyword matching (`NovelMatcher`)
//! - Reply rendering (`ReplyComposer`)
//! - Reply submission (`Submitter`)

mod detail;
#[cfg(test)]
pub(crate) mod fake;
mod keywords;
mod matcher;
mod reply;
mod search;
mod submit;

pub use detail::{CatalogDetailResolver, DetailPage, parse_detail};
pub use keywords::KeywordExtractor;
pub use matcher::{Catalog, HttpCatalog, NovelMatcher};
pub use reply::ReplyComposer;
pub use search::{CatalogSearchClient, parse_search_results};
pub use submit::{SubmitOutcome, Submitter, rate_limit_seconds};
