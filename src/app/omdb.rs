// src/app/omdb.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;
use urlencoding::encode;

use crate::error::{FetchError, FetchResult};

/// Results per search page; a shorter page means the listing is exhausted.
pub const PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Search", default)]
    search: Vec<SearchHit>,
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

/// Detail record for one title (`?i=` lookup).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Rated")]
    pub rated: String,
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Writer")]
    pub writer: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Awards")]
    pub awards: String,
    #[serde(rename = "Poster")]
    pub poster: String,
    #[serde(rename = "Ratings")]
    pub ratings: Vec<Rating>,
    #[serde(rename = "Metascore")]
    pub metascore: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "totalSeasons")]
    pub total_seasons: String,
    #[serde(rename = "DVD")]
    pub dvd: String,
    #[serde(rename = "BoxOffice")]
    pub box_office: String,
    #[serde(rename = "Production")]
    pub production: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

// ---- URLs ----

pub fn search_url(base: &str, api_key: &str, term: &str, page: u32) -> String {
    format!(
        "{base}?apikey={}&s={}&page={page}",
        encode(api_key.trim()),
        encode(term.trim()),
    )
}

pub fn detail_url(base: &str, api_key: &str, id: &str, full_plot: bool) -> String {
    format!(
        "{base}?apikey={}&i={}&plot={}",
        encode(api_key.trim()),
        encode(id.trim()),
        if full_plot { "full" } else { "short" },
    )
}

// ---- response parsing ----

fn is_not_found(msg: &str) -> bool {
    msg.to_ascii_lowercase().contains("not found")
}

fn failed(response: &str) -> bool {
    response.eq_ignore_ascii_case("false")
}

/// "Not found" is how the API ends a listing, so it yields an empty page.
pub fn parse_search(body: &str) -> FetchResult<Vec<SearchHit>> {
    let envelope: SearchEnvelope = serde_json::from_str(body)?;
    if failed(&envelope.response) {
        let msg = envelope.error.unwrap_or_else(|| "search failed".into());
        if is_not_found(&msg) {
            return Ok(Vec::new());
        }
        return Err(FetchError::Api(msg));
    }
    Ok(envelope.search)
}

pub fn parse_detail(body: &str) -> FetchResult<Item> {
    let item: Item = serde_json::from_str(body)?;
    if failed(&item.response) {
        let msg = item.error.clone().unwrap_or_else(|| "lookup failed".into());
        return Err(FetchError::Api(msg));
    }
    if item.title.trim().is_empty() {
        return Err(FetchError::Api("record has no title".into()));
    }
    Ok(item)
}

// ---- client ----

/// Blocking OMDb client. Lives on the worker thread.
pub struct OmdbClient {
    http: Client,
    base_url: String,
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>) -> FetchResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("omdbfetch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn search(&self, api_key: &str, term: &str, page: u32) -> FetchResult<Vec<SearchHit>> {
        debug!("search \"{term}\" page {page}");
        self.get_parsed(&search_url(&self.base_url, api_key, term, page), parse_search)
    }

    pub fn get_by_id(&self, api_key: &str, id: &str, full_plot: bool) -> FetchResult<Item> {
        debug!("detail {id} (full plot: {full_plot})");
        self.get_parsed(&detail_url(&self.base_url, api_key, id, full_plot), parse_detail)
    }

    pub fn get_bytes(&self, url: &str) -> FetchResult<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())?;
        Ok(bytes.to_vec())
    }

    /// OMDb answers API failures (bad key, request limit) with a 4xx status
    /// and a JSON body, so the body is parsed before the status is checked.
    fn get_parsed<T>(&self, url: &str, parse: fn(&str) -> FetchResult<T>) -> FetchResult<T> {
        let resp = self.http.get(url).send()?;
        let status_err = resp.error_for_status_ref().err();
        let body = resp.text()?;
        match (parse(&body), status_err) {
            (Err(FetchError::Api(msg)), _) => Err(FetchError::Api(msg)),
            (_, Some(err)) => Err(err.into()),
            (parsed, None) => parsed,
        }
    }
}
