use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub requests: Option<u64>,
    pub concurrent: Option<usize>,
    #[serde(alias = "max_error")]
    pub maxerror: Option<i64>,
    pub cpu: Option<usize>,
    pub headers: Option<Vec<String>>,
    pub no_ua: Option<bool>,
}
