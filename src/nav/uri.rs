//! # Navigation URIs
//!
//! `destination?key=value&key=value`. Values are percent-encoded on output
//! and decoded on parse. The reserved key [`CREATE_TAB`] may repeat; its
//! values, in order, are the child pages of a tabbed container.

use std::fmt;

use crate::core::UsageError;

pub const CREATE_TAB: &str = "createTab";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationUri {
    path: String,
    query: Vec<(String, String)>,
}

impl NavigationUri {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// A tabbed container whose children are `pages`, in order.
    pub fn tabbed<S: AsRef<str>>(container: impl Into<String>, pages: &[S]) -> Self {
        pages
            .iter()
            .fold(Self::new(container), |uri, page| uri.with_param(CREATE_TAB, page.as_ref()))
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn parse(raw: &str) -> Result<Self, UsageError> {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };
        if path.trim().is_empty() {
            return Err(UsageError::InvalidUri(raw.to_string()));
        }

        let mut uri = Self::new(path);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(key).map_err(|_| UsageError::InvalidUri(raw.to_string()))?;
            let value =
                urlencoding::decode(value).map_err(|_| UsageError::InvalidUri(raw.to_string()))?;
            uri.query.push((key.into_owned(), value.into_owned()));
        }
        Ok(uri)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Child pages declared with [`CREATE_TAB`], in declaration order.
    pub fn tabs(&self) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == CREATE_TAB)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Query parameters other than [`CREATE_TAB`].
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query
            .iter()
            .filter(|(k, _)| k != CREATE_TAB)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for NavigationUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(
                f,
                "{}{}={}",
                sep,
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}
