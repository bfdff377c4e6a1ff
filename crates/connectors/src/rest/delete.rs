use crate::{
    delete::{ContactDeleter, DeleteOutcome},
    error::ProviderError,
    rest::auth::AccessToken,
};
use async_trait::async_trait;
use model::naming::ContainerKey;
use serde::{Deserialize, Serialize};
use tracing::info;

const DELETE_PATH: &str = "contacts/v1/contacts/actions/delete";
const DELETE_OPERATION_TYPE: &str = "ContactAndAttributes";
/// Provider list type for keyed data containers.
const LIST_TYPE_ID: u32 = 3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    delete_operation_type: &'static str,
    target_list: TargetList<'a>,
    delete_list_when_completed: bool,
    delete_list_contents_when_completed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetList<'a> {
    list_key: &'a str,
    list_type: ListType,
}

#[derive(Debug, Serialize)]
struct ListType {
    #[serde(rename = "listTypeID")]
    list_type_id: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    has_errors: bool,
}

/// Bulk-delete client for the provider's contacts API. Addresses the
/// container by list key; the provider performs the deletion
/// asynchronously and only acknowledges acceptance here.
pub struct RestContactDeleter {
    http: reqwest::Client,
}

impl RestContactDeleter {
    pub fn new() -> Self {
        RestContactDeleter {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for RestContactDeleter {
    fn default() -> Self {
        RestContactDeleter::new()
    }
}

#[async_trait]
impl ContactDeleter for RestContactDeleter {
    async fn delete_container(
        &self,
        token: &AccessToken,
        container: &ContainerKey,
    ) -> Result<DeleteOutcome, ProviderError> {
        let base = token.rest_instance_url().trim_end_matches('/');
        let url = format!("{base}/{DELETE_PATH}");

        let request = DeleteRequest {
            delete_operation_type: DELETE_OPERATION_TYPE,
            target_list: TargetList {
                list_key: container.as_str(),
                list_type: ListType {
                    list_type_id: LIST_TYPE_ID,
                },
            },
            delete_list_when_completed: false,
            delete_list_contents_when_completed: true,
        };

        let response = self
            .http
            .post(url)
            .query(&[("type", "listReference")])
            .bearer_auth(token.bearer())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: DeleteResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))?;
        info!(
            container = %container,
            has_errors = payload.has_errors,
            "bulk delete request acknowledged"
        );
        Ok(DeleteOutcome {
            has_errors: payload.has_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token(server: &MockServer) -> AccessToken {
        // Instance URLs from the provider carry a trailing slash.
        AccessToken::new("tok-123", format!("{}/", server.uri()))
    }

    #[tokio::test]
    async fn posts_a_list_reference_delete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts/v1/contacts/actions/delete"))
            .and(query_param("type", "listReference"))
            .and(header("Authorization", "Bearer tok-123"))
            .and(body_partial_json(json!({
                "deleteOperationType": "ContactAndAttributes",
                "targetList": {
                    "listKey": "Batch7",
                    "listType": { "listTypeID": 3 },
                },
                "deleteListWhenCompleted": false,
                "deleteListContentsWhenCompleted": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hasErrors": false,
                "requestServiceMessageID": "ignored",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = RestContactDeleter::new()
            .delete_container(&token(&server), &ContainerKey::from("Batch7"))
            .await
            .unwrap();
        assert!(!outcome.has_errors);
    }

    #[tokio::test]
    async fn provider_reported_errors_flow_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts/v1/contacts/actions/delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hasErrors": true })))
            .mount(&server)
            .await;

        let outcome = RestContactDeleter::new()
            .delete_container(&token(&server), &ContainerKey::from("Batch7"))
            .await
            .unwrap();
        assert!(outcome.has_errors);
    }

    #[tokio::test]
    async fn response_without_has_errors_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts/v1/contacts/actions/delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let err = RestContactDeleter::new()
            .delete_container(&token(&server), &ContainerKey::from("Batch7"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
