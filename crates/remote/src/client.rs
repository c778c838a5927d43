//! pCloud HTTP JSON API client
//!
//! Every call is a single request against `https://<api_host>/<method>`
//! carrying the session `auth` token. Responses are JSON objects whose
//! `result` field is 0 on success and a pCloud error code otherwise.
//!
//! No retries: a failed request surfaces immediately to the caller.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::PCloudConfig;
use crate::error::{RemoteError, Result};
use crate::paths::{normalize_path, split_path};
use crate::storage::RemoteStorage;
use crate::types::{FolderListing, RemoteEntry, UploadOptions};

/// Authenticated pCloud API client
pub struct PCloudClient {
    http: reqwest::Client,
    base_url: String,
    /// Session token, sent with every request
    auth: SecretString,
}

impl PCloudClient {
    /// Log in with the configured username/password and obtain an auth token
    pub async fn login(config: &PCloudConfig) -> Result<Self> {
        let username = config
            .username
            .as_deref()
            .ok_or_else(|| RemoteError::Config("username is not set".into()))?;
        let password = config
            .password
            .as_ref()
            .ok_or_else(|| RemoteError::Config("password is not set".into()))?;

        let http = Self::build_http(config)?;
        let base_url = Self::base_url(&config.api_host);

        let response = http
            .get(format!("{base_url}/userinfo"))
            .query(&[
                ("getauth", "1"),
                ("logout", "1"),
                ("username", username),
                ("password", password.expose_secret().as_str()),
            ])
            .send()
            .await?;
        let body = Self::parse_response(response).await?;

        let auth = body
            .get("auth")
            .and_then(Value::as_str)
            .ok_or(RemoteError::InvalidResponse)?;

        info!(host = %config.api_host, "Authenticated with pCloud");

        Ok(Self {
            http,
            base_url,
            auth: SecretString::new(auth.to_string()),
        })
    }

    fn build_http(config: &PCloudConfig) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?)
    }

    fn base_url(host: &str) -> String {
        let host = host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    /// Perform an authenticated API call and return the checked JSON body
    async fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        debug!(method, "pCloud API call");

        let response = self
            .http
            .get(format!("{}/{method}", self.base_url))
            .query(&[("auth", self.auth.expose_secret().as_str())])
            .query(params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Http(status.as_u16()));
        }
        let body: Value = response.json().await?;
        check_result(body)
    }
}

/// Map a pCloud response envelope to `Ok(body)` or the API error it reports
fn check_result(body: Value) -> Result<Value> {
    match body.get("result").and_then(Value::as_u64) {
        Some(0) => Ok(body),
        Some(code) => Err(RemoteError::Api {
            code,
            message: body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        None => Err(RemoteError::InvalidResponse),
    }
}

/// Pick the download URL out of a `getfilelink` response
fn file_link(body: &Value) -> Result<String> {
    let host = body
        .get("hosts")
        .and_then(Value::as_array)
        .and_then(|hosts| hosts.first())
        .and_then(Value::as_str)
        .ok_or(RemoteError::InvalidResponse)?;
    let path = body
        .get("path")
        .and_then(Value::as_str)
        .ok_or(RemoteError::InvalidResponse)?;
    Ok(format!("https://{host}{path}"))
}

/// Extract the single entry from an `uploadfile` response
fn uploaded_entry(mut body: Value) -> Result<RemoteEntry> {
    let first = body
        .get_mut("metadata")
        .and_then(Value::as_array_mut)
        .filter(|items| !items.is_empty())
        .map(|items| items.swap_remove(0))
        .ok_or(RemoteError::InvalidResponse)?;
    Ok(serde_json::from_value(first)?)
}

fn metadata_entry(mut body: Value) -> Result<RemoteEntry> {
    let metadata = body
        .get_mut("metadata")
        .map(Value::take)
        .ok_or(RemoteError::InvalidResponse)?;
    Ok(serde_json::from_value(metadata)?)
}

#[async_trait]
impl RemoteStorage for PCloudClient {
    async fn list_folder(&self, path: &str) -> Result<FolderListing> {
        let path = normalize_path(path);
        let body = self.call("listfolder", &[("path", path.as_str())]).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn download_file(&self, path: &str) -> Result<Vec<u8>> {
        let path = normalize_path(path);
        let body = self
            .call("getfilelink", &[("path", path.as_str()), ("forcedownload", "1")])
            .await?;
        let url = file_link(&body)?;

        debug!(path = %path, "Downloading file content");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Http(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn upload_file(
        &self,
        data: Vec<u8>,
        path: &str,
        options: &UploadOptions,
    ) -> Result<RemoteEntry> {
        let (folder, filename) = split_path(path)
            .ok_or_else(|| RemoteError::NotAFile(normalize_path(path)))?;

        let mut query: Vec<(&str, String)> = vec![
            ("auth", self.auth.expose_secret().clone()),
            ("path", folder),
            ("filename", filename.clone()),
            ("nopartial", "1".to_string()),
        ];
        if options.autorename {
            query.push(("renameifexists", "1".to_string()));
        }
        if let Some(modified) = options.client_modified {
            query.push(("mtime", modified.timestamp().to_string()));
        }

        debug!(path = %path, bytes = data.len(), "Uploading file content");
        let part = reqwest::multipart::Part::bytes(data).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/uploadfile", self.base_url))
            .query(&query)
            .multipart(form)
            .send()
            .await?;
        let body = Self::parse_response(response).await?;
        uploaded_entry(body)
    }

    async fn create_folder(&self, path: &str) -> Result<RemoteEntry> {
        let path = normalize_path(path);
        let body = self.call("createfolder", &[("path", path.as_str())]).await?;
        metadata_entry(body)
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        self.call("deletefile", &[("path", path.as_str())]).await?;
        Ok(())
    }

    async fn delete_folder(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        self.call("deletefolder", &[("path", path.as_str())]).await?;
        Ok(())
    }

    async fn delete_folder_recursive(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        self.call("deletefolderrecursive", &[("path", path.as_str())]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_zero_result() {
        let body = check_result(json!({ "result": 0, "auth": "token" })).unwrap();
        assert_eq!(body["auth"], "token");
    }

    #[test]
    fn maps_api_errors() {
        let err = check_result(json!({ "result": 2005, "error": "Directory does not exist." }))
            .unwrap_err();
        match err {
            RemoteError::Api { code, ref message } => {
                assert_eq!(code, 2005);
                assert_eq!(message, "Directory does not exist.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_not_found());
    }

    #[test]
    fn rejects_missing_result() {
        assert!(matches!(
            check_result(json!({ "metadata": {} })),
            Err(RemoteError::InvalidResponse)
        ));
    }

    #[test]
    fn builds_download_link() {
        let body = json!({
            "result": 0,
            "path": "/cBZkvG2cXZWbn7Zt/a.txt",
            "hosts": ["p-def1.pcloud.com", "c1.pcloud.com"]
        });
        assert_eq!(
            file_link(&body).unwrap(),
            "https://p-def1.pcloud.com/cBZkvG2cXZWbn7Zt/a.txt"
        );
        assert!(file_link(&json!({ "result": 0, "hosts": [] })).is_err());
    }

    #[test]
    fn extracts_uploaded_entry() {
        let body = json!({
            "result": 0,
            "fileids": [99],
            "metadata": [{
                "path": "/docs/a.txt",
                "name": "a.txt",
                "isfolder": false,
                "size": 3,
                "fileid": 99
            }]
        });
        let entry = uploaded_entry(body).unwrap();
        assert_eq!(entry.name, "a.txt");
        assert_eq!(entry.size, Some(3));
        assert!(uploaded_entry(json!({ "result": 0, "metadata": [] })).is_err());
    }

    #[test]
    fn base_url_accepts_bare_host_or_url() {
        assert_eq!(PCloudClient::base_url("eapi.pcloud.com"), "https://eapi.pcloud.com");
        assert_eq!(
            PCloudClient::base_url("http://localhost:8080/"),
            "http://localhost:8080"
        );
    }
}
