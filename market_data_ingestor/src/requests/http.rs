use reqwest::Client;
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::{
    providers::{ClientBuildSnafu, ProviderInitError, ProviderError, RequestSnafu},
    requests::retry::{RetryPolicy, with_retries},
};

const USER_AGENT: &str = concat!("news-sync/", env!("CARGO_PKG_VERSION"));

/// `reqwest` client bound to a [`RetryPolicy`].
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(policy: RetryPolicy) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context(ClientBuildSnafu)?;
        Ok(Self { client, policy })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn get_once(&self, url: &str) -> Result<reqwest::Response, ProviderError> {
        self.client
            .get(url)
            .timeout(self.policy.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context(RequestSnafu { url })
    }

    /// GET `url` as text; `None` once the retry policy is exhausted.
    pub async fn get_text(&self, url: &str) -> Option<String> {
        with_retries(&self.policy, url, || async move {
            let resp = self.get_once(url).await?;
            resp.text().await.context(RequestSnafu { url })
        })
        .await
    }

    /// GET `url` and decode a JSON body; `None` once the retry policy is exhausted.
    ///
    /// A body that fails to decode counts as a failed attempt.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        with_retries(&self.policy, url, || async move {
            let resp = self.get_once(url).await?;
            resp.json::<T>().await.context(RequestSnafu { url })
        })
        .await
    }
}
