use serde::Deserialize;
use serde_json::json;

use crate::{GetOptions, GetResponse, GitLab, GitLabError, Result};

/// Fields of a merge request this crate cares about.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub web_url: String,
}

/// Accessor for one merge request of one project.
#[derive(Debug)]
pub struct ProjectMergeRequest<'a> {
    gl: &'a GitLab,
    project_id: u64,
    mr_iid: u64,
}

impl<'a> ProjectMergeRequest<'a> {
    pub fn new(gl: &'a GitLab, project_id: u64, mr_iid: u64) -> Self {
        Self {
            gl,
            project_id,
            mr_iid,
        }
    }

    pub fn path(&self) -> String {
        format!(
            "/projects/{}/merge_requests/{}",
            self.project_id, self.mr_iid
        )
    }

    pub async fn get(&self) -> Result<MergeRequest> {
        match self.gl.http_get(&self.path(), (), GetOptions::default()).await? {
            GetResponse::Json(value) => decode_merge_request(value),
            GetResponse::Raw(response) => Err(GitLabError::Decode(format!(
                "expected JSON merge request, got content type {:?}",
                response.headers().get(reqwest::header::CONTENT_TYPE)
            ))),
        }
    }

    pub async fn labels(&self) -> Result<Vec<String>> {
        Ok(self.get().await?.labels)
    }

    /// Adds labels, keeping the ones already set. Returns the updated merge request.
    pub async fn add_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<MergeRequest> {
        let labels = labels
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");

        #[cfg(feature = "tracing")]
        tracing::info!(path = %self.path(), %labels, "adding labels");

        let response = self
            .gl
            .http_put(&self.path(), (), Some(json!({ "add_labels": labels }).into()))
            .await?;
        let body = response.text().await.map_err(GitLabError::Transport)?;
        let value = serde_json::from_str(&body).map_err(|err| {
            GitLabError::Decode(format!("invalid merge request JSON: {err}; body: {body}"))
        })?;
        decode_merge_request(value)
    }
}

fn decode_merge_request(value: serde_json::Value) -> Result<MergeRequest> {
    serde_json::from_value(value)
        .map_err(|err| GitLabError::Decode(format!("unexpected merge request shape: {err}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{decode_merge_request, ProjectMergeRequest};
    use crate::{ClientConfig, GitLab};

    #[test]
    fn path_uses_project_and_iid() {
        let gl = GitLab::new(ClientConfig::default()).unwrap();
        let mr = ProjectMergeRequest::new(&gl, 12, 3);
        assert_eq!(mr.path(), "/projects/12/merge_requests/3");
    }

    #[test]
    fn decodes_and_ignores_unknown_fields() {
        let mr = decode_merge_request(json!({
            "id": 999,
            "iid": 3,
            "title": "Fix it",
            "state": "opened",
            "labels": ["bug", "api label"],
            "web_url": "https://gitlab.example.com/g/p/-/merge_requests/3",
            "draft": false
        }))
        .unwrap();
        assert_eq!(mr.iid, 3);
        assert_eq!(mr.labels, vec!["bug", "api label"]);
    }

    #[test]
    fn missing_labels_default_to_empty() {
        let mr = decode_merge_request(json!({
            "iid": 1,
            "title": "t",
            "state": "merged",
            "web_url": "u"
        }))
        .unwrap();
        assert!(mr.labels.is_empty());
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        assert!(matches!(
            decode_merge_request(json!({"iid": "x"})),
            Err(crate::GitLabError::Decode(_))
        ));
    }
}
