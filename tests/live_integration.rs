use gitlaber::{ClientConfig, GitLab, GitLabConfig, ProjectMergeRequest, DEFAULT_SECTION};

struct LiveTarget {
    gl: GitLab,
    project_id: u64,
    mr_iid: u64,
}

fn env_var(name: &str) -> Result<String, String> {
    std::env::var(name).map_err(|_| format!("missing {name} environment variable"))
}

/// Reads the target from `GITLAB_*` env vars, falling back to `gitlaber.cfg`
/// for credentials. `GITLAB_MR_IID` is always required.
fn load_live_target() -> Result<LiveTarget, String> {
    let mr_iid = env_var("GITLAB_MR_IID")?
        .parse::<u64>()
        .map_err(|err| format!("GITLAB_MR_IID is not a number: {err}"))?;

    if let (Ok(url), Ok(token), Ok(project_id)) = (
        env_var("GITLAB_URL"),
        env_var("GITLAB_TOKEN"),
        env_var("GITLAB_PROJECT_ID"),
    ) {
        let project_id = project_id
            .parse::<u64>()
            .map_err(|err| format!("GITLAB_PROJECT_ID is not a number: {err}"))?;
        let gl = GitLab::new(ClientConfig::new(Some(&url), Some(&token)))
            .map_err(|err| err.to_string())?;
        return Ok(LiveTarget {
            gl,
            project_id,
            mr_iid,
        });
    }

    let config = GitLabConfig::load(DEFAULT_SECTION).map_err(|err| err.to_string())?;
    let gl = GitLab::from_config(&config).map_err(|err| err.to_string())?;
    Ok(LiveTarget {
        gl,
        project_id: config.project_id,
        mr_iid,
    })
}

#[tokio::test]
async fn live_merge_request_labels() {
    let target = match load_live_target() {
        Ok(target) => target,
        Err(reason) => {
            eprintln!("skipping live test: {reason}");
            return;
        }
    };

    let mr = ProjectMergeRequest::new(&target.gl, target.project_id, target.mr_iid);
    let merge_request = mr.get().await.expect("merge request must load");
    assert_eq!(merge_request.iid, target.mr_iid);

    let labels = mr.labels().await.expect("labels must load");
    assert_eq!(labels, merge_request.labels);
}
