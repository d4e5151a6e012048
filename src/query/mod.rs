pub mod cache;
pub mod client;
pub mod config;

pub use client::{Query, QueryClient, QueryError, QueryState};
pub use config::QueryConfig;

use std::fmt;

/// 快取 key 註冊表：每種查詢形狀一個唯一 token，整個程式內不可重複
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    GetBeers,
    GetBeer,
    GetCountries,
    GetCountry,
}

impl QueryKey {
    pub const ALL: [QueryKey; 4] = [
        QueryKey::GetBeers,
        QueryKey::GetBeer,
        QueryKey::GetCountries,
        QueryKey::GetCountry,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            QueryKey::GetBeers => "get-beers",
            QueryKey::GetBeer => "get-beer",
            QueryKey::GetCountries => "get-countries",
            QueryKey::GetCountry => "get-country",
        }
    }

    /// 帶參數的查詢 key，例如 `get-beer:1`
    pub fn with_param(self, param: &str) -> String {
        format!("{}:{}", self.token(), param)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
