//! CRUD client for the hosted row store that holds saved channels.
//!
//! The store is a Baserow-style table API: `GET` lists rows page by page, `POST` creates a row,
//! and `DELETE {id}/` removes one. Requests authenticate with `Authorization: Token <token>`.
//! Field names are translated to and from [`Channel`] in [`rows`].

pub mod rows;

use crate::config::StoreConfig;
use crate::model::{Channel, ChannelDraft};
use crate::paging::PagedStream;
use crate::{Error, Result};
use http::Method;
use rows::{ChannelRow, NewChannelRow, RowPage};
use serde::Serialize;
use tokio_stream::{Stream, StreamExt};
use tracing::instrument;

/// Rows requested per list page; the store caps this at 200.
const PAGE_SIZE: &str = "100";

#[derive(Debug, Clone)]
pub struct StoreClient {
    config: StoreConfig,
    client: reqwest::Client,
}

impl StoreClient {
    pub fn new(config: StoreConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Makes an authenticated request against the store.
    ///
    /// Any failure to get a 2xx answer becomes [`Error::StoreUnavailable`] carrying the status
    /// (when there is one) and the store's error text.
    #[instrument(skip(self, query_params, json_body), level = tracing::Level::TRACE)]
    async fn request(
        &self,
        method: Method,
        url: &str,
        query_params: Option<&[(&str, &str)]>,
        json_body: Option<&impl Serialize>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header("Authorization", format!("Token {}", self.config.token));

        if let Some(params) = query_params {
            request = request.query(params);
        }

        if let Some(body) = json_body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(Error::store_transport)?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!(%method, %status_code, "row store request failed");
            return Err(Error::StoreUnavailable {
                status: Some(status_code.as_u16()),
                message: store_error_message(&error_text),
            });
        }

        Ok(response)
    }

    async fn list_page(&self, next: Option<String>) -> Result<RowPage> {
        let response = match next {
            // `next` already carries every query parameter of the first request
            Some(url) => {
                self.request(Method::GET, &url, None, None::<&()>)
                    .await?
            }
            None => {
                let query_params = [("user_field_names", "true"), ("size", PAGE_SIZE)];
                self.request(
                    Method::GET,
                    &self.config.rows_url,
                    Some(&query_params),
                    None::<&()>,
                )
                .await?
            }
        };

        let page: RowPage = response.json().await.map_err(|e| Error::StoreUnavailable {
            status: None,
            message: format!("parse rows page: {e}"),
        })?;

        tracing::debug!(
            total_rows = page.count,
            returned_items = page.results.len(),
            "fetched store rows"
        );

        Ok(page)
    }

    /// Returns a paginated stream of every saved channel.
    ///
    /// Pages are fetched lazily, following the store's `next` links.
    pub fn rows(&self) -> impl Stream<Item = Result<Channel>> + use<'_> {
        PagedStream::new(|next| async {
            let page = self.list_page(next).await?;
            Ok((page.results, page.next))
        })
        .map(|row: Result<ChannelRow>| row.map(Channel::from))
    }

    /// Lists every saved channel. An empty table yields an empty list.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Channel>> {
        let rows = self.rows();
        let mut rows = std::pin::pin!(rows);

        let mut channels = Vec::new();
        while let Some(channel) = rows.next().await {
            channels.push(channel?);
        }

        tracing::debug!(count = channels.len(), "listed channels");
        Ok(channels)
    }

    /// Persists a new channel row and returns it as stored.
    ///
    /// Fails with [`Error::Validation`], without contacting the store, if the draft has no name.
    #[instrument(skip(self, draft), fields(name = ?draft.name))]
    pub async fn create(&self, draft: &ChannelDraft) -> Result<Channel> {
        let row = NewChannelRow::try_from(draft)?;

        let query_params = [("user_field_names", "true")];
        let response = self
            .request(
                Method::POST,
                &self.config.rows_url,
                Some(&query_params),
                Some(&row),
            )
            .await?;

        let created: ChannelRow = response.json().await.map_err(|e| Error::StoreUnavailable {
            status: None,
            message: format!("parse created row: {e}"),
        })?;

        tracing::info!(row_id = created.id, name = %row.name, "saved channel");
        Ok(Channel::from(created))
    }

    /// Removes a row by its store identifier.
    #[instrument(skip(self))]
    pub async fn delete(&self, row_id: u64) -> Result<()> {
        let url = format!("{}{}/", self.config.rows_url, row_id);
        self.request(Method::DELETE, &url, None, None::<&()>)
            .await?;

        tracing::info!(row_id, "deleted channel row");
        Ok(())
    }

    /// The first saved channel whose name is exactly `name`.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Channel>> {
        let rows = self.rows();
        let mut rows = std::pin::pin!(rows);

        while let Some(channel) = rows.next().await {
            let channel = channel?;
            if channel.name == name {
                return Ok(Some(channel));
            }
        }
        Ok(None)
    }

    /// Looks the channel up by name, then deletes its row.
    ///
    /// Fails with [`Error::NotFound`], issuing no delete, when no row has that name. Names are
    /// not unique; only the first match is removed.
    #[instrument(skip(self))]
    pub async fn delete_by_name(&self, name: &str) -> Result<Channel> {
        let Some(channel) = self.find_by_name(name).await? else {
            return Err(Error::NotFound(format!("no saved channel named {name:?}")));
        };
        self.delete(channel.id).await?;
        Ok(channel)
    }
}

/// Pulls the human-readable part out of a store error body.
///
/// The store answers with `{"error": "ERROR_CODE", "detail": ...}`, where `detail` is either a
/// message or a per-field map.
fn store_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    let error = value.get("error").and_then(|e| e.as_str());
    let detail = value.get("detail").map(|d| match d.as_str() {
        Some(s) => s.to_string(),
        None => d.to_string(),
    });
    match (error, detail) {
        (Some(error), Some(detail)) => format!("{error}: {detail}"),
        (Some(error), None) => error.to_string(),
        (None, Some(detail)) => detail,
        (None, None) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn store_errors() {
        assert_eq!(
            store_error_message(
                r#"{"error":"ERROR_INVALID_ACCESS_TOKEN","detail":"The token is invalid."}"#
            ),
            "ERROR_INVALID_ACCESS_TOKEN: The token is invalid."
        );
        assert_eq!(
            store_error_message(r#"{"error":"ERROR_ROW_DOES_NOT_EXIST"}"#),
            "ERROR_ROW_DOES_NOT_EXIST"
        );
        assert_eq!(store_error_message("<html>502</html>"), "<html>502</html>");
    }
}
