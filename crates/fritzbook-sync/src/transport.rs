use crate::error::Result;
use std::time::Duration;

/// An authenticated connection to the router. Session acquisition happens
/// outside this crate; implementations only hand out the session id.
pub trait Transport {
    fn session_id(&self) -> Result<String>;
    fn post_form(&self, path: &str, headers: &[(String, String)], body: Vec<u8>)
        -> Result<String>;
    fn get(&self, path_or_url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            user_agent: "fritzbook".to_string(),
        }
    }
}

#[cfg(feature = "http")]
mod imp {
    use super::{HttpOptions, Result, Transport};
    use crate::error::SyncError;
    use reqwest::blocking::Client;
    use std::time::Duration;
    use tracing::debug;
    use url::Url;

    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        base_url: Url,
        session_id: Option<String>,
        client: Client,
    }

    impl HttpTransport {
        pub fn new(hostname: &str, session_id: Option<String>, options: &HttpOptions) -> Result<Self> {
            let base_url = Url::parse(hostname)?;
            if !matches!(base_url.scheme(), "http" | "https") {
                return Err(SyncError::Parse(format!(
                    "router url must use http or https: {hostname}"
                )));
            }
            Ok(Self {
                base_url,
                session_id,
                client: build_client(options)?,
            })
        }

        pub(crate) fn resolve(&self, path_or_url: &str) -> Result<Url> {
            if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
                return Ok(Url::parse(path_or_url)?);
            }
            let mut url = self.base_url.join(path_or_url)?;
            if let Some(sid) = self.session_id.as_deref() {
                url.query_pairs_mut().append_pair("sid", sid);
            }
            Ok(url)
        }
    }

    impl Transport for HttpTransport {
        fn session_id(&self) -> Result<String> {
            self.session_id
                .clone()
                .ok_or_else(|| SyncError::Unavailable("no router session id".to_string()))
        }

        fn post_form(
            &self,
            path: &str,
            headers: &[(String, String)],
            body: Vec<u8>,
        ) -> Result<String> {
            let url = self.base_url.join(path)?;
            debug!(%url, "POST");
            let mut request = self.client.post(url);
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
            let response = request.body(body).send()?.error_for_status()?;
            Ok(response.text()?)
        }

        fn get(&self, path_or_url: &str) -> Result<Vec<u8>> {
            let url = self.resolve(path_or_url)?;
            debug!(%url, "GET");
            let response = self.client.get(url).send()?.error_for_status()?;
            Ok(response.bytes()?.to_vec())
        }
    }

    fn build_client(options: &HttpOptions) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .connect_timeout(Duration::from_secs(10).min(options.timeout))
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?)
    }
}

#[cfg(not(feature = "http"))]
mod imp {
    use super::{HttpOptions, Result, Transport};
    use crate::error::SyncError;

    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        hostname: String,
        session_id: Option<String>,
    }

    impl HttpTransport {
        pub fn new(hostname: &str, session_id: Option<String>, options: &HttpOptions) -> Result<Self> {
            let _ = options;
            Ok(Self {
                hostname: hostname.to_string(),
                session_id,
            })
        }
    }

    impl Transport for HttpTransport {
        fn session_id(&self) -> Result<String> {
            self.session_id
                .clone()
                .ok_or_else(|| SyncError::Unavailable("no router session id".to_string()))
        }

        fn post_form(&self, _path: &str, _headers: &[(String, String)], _body: Vec<u8>) -> Result<String> {
            Err(unavailable(&self.hostname))
        }

        fn get(&self, _path_or_url: &str) -> Result<Vec<u8>> {
            Err(unavailable(&self.hostname))
        }
    }

    fn unavailable(hostname: &str) -> SyncError {
        SyncError::Unavailable(format!(
            "contacting {hostname} requires the http feature"
        ))
    }
}

pub use imp::HttpTransport;

#[cfg(all(test, feature = "http"))]
mod tests {
    use super::{HttpOptions, HttpTransport, Transport};

    #[test]
    fn rejects_non_http_router_url() {
        let err = HttpTransport::new("ftp://fritz.box", None, &HttpOptions::default()).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn missing_session_id_is_unavailable() {
        let transport =
            HttpTransport::new("https://fritz.box", None, &HttpOptions::default()).expect("transport");
        assert!(transport.session_id().is_err());
    }

    #[test]
    fn relative_paths_carry_the_session_id() {
        let transport = HttpTransport::new(
            "https://fritz.box",
            Some("abc".to_string()),
            &HttpOptions::default(),
        )
        .expect("transport");
        let url = transport.resolve("/fon_num/fonbook_list.lua").expect("url");
        assert_eq!(url.as_str(), "https://fritz.box/fon_num/fonbook_list.lua?sid=abc");
        let url = transport.resolve("https://example.org/x").expect("url");
        assert_eq!(url.as_str(), "https://example.org/x");
    }
}
