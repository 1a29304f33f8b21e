use reqwest::{
    Method, Request, Url,
    header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};

use crate::config::RunConfig;
use crate::error::HttpError;

/// Recipe the dispatcher turns into one [`RequestDescriptor`] per request.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
}

impl RequestTemplate {
    #[must_use]
    pub fn new(method: Method, url: &str, headers: Vec<(String, String)>) -> Self {
        Self {
            method,
            url: url.to_owned(),
            headers,
        }
    }

    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        let mut headers = Vec::with_capacity(config.headers.len().saturating_add(1));
        if let Some(user_agent) = config.user_agent
            && !has_header(&config.headers, USER_AGENT.as_str())
        {
            headers.push((USER_AGENT.as_str().to_owned(), user_agent.to_owned()));
        }
        headers.extend(config.headers.iter().cloned());
        Self::new(Method::GET, config.url.as_str(), headers)
    }

    /// Builds the descriptor for request number `seq`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL or a header cannot be represented.
    pub fn build(&self, seq: u64) -> Result<RequestDescriptor, HttpError> {
        let url = Url::parse(&self.url).map_err(|err| HttpError::InvalidUrl {
            url: self.url.clone(),
            source: err,
        })?;
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (key, value) in &self.headers {
            let name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|err| HttpError::InvalidHeaderName {
                    header: key.clone(),
                    source: err,
                })?;
            let value = HeaderValue::from_str(value).map_err(|err| HttpError::InvalidHeaderValue {
                header: key.clone(),
                source: err,
            })?;
            headers.append(name, value);
        }
        Ok(RequestDescriptor {
            seq,
            method: self.method.clone(),
            url,
            headers,
        })
    }
}

/// One request to issue. Owned by exactly one worker once dispatched.
#[derive(Debug)]
pub struct RequestDescriptor {
    pub seq: u64,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    #[must_use]
    pub fn into_request(self) -> Request {
        let mut request = Request::new(self.method, self.url);
        *request.headers_mut() = self.headers;
        request
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
}
