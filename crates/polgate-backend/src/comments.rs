use anyhow::Context;
use serde::Deserialize;

/// Change-request comment history, consumed once per run by the override
/// resolver. A fetch failure is handled upstream as degraded mode (empty
/// override set), never as a run abort.
pub trait CommentSource: Sync {
    fn list_comments(&self) -> anyhow::Result<Vec<String>>;
}

/// Fixed comment list, for local runs and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticComments(Vec<String>);

impl StaticComments {
    pub fn new(comments: Vec<String>) -> Self {
        Self(comments)
    }
}

impl CommentSource for StaticComments {
    fn list_comments(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Issue comments of one pull request, fetched page by page from the
/// GitHub REST API.
pub struct GithubCommentSource {
    repo: String,
    pr_number: u64,
    token: String,
    api_base: String,
}

const PAGE_SIZE: usize = 100;

#[derive(Deserialize)]
struct IssueComment {
    #[serde(default)]
    body: Option<String>,
}

impl GithubCommentSource {
    /// `repo` is `owner/name`; `token` is a bearer token with read access.
    pub fn new(repo: impl Into<String>, pr_number: u64, token: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            pr_number,
            token: token.into(),
            api_base: "https://api.github.com".to_string(),
        }
    }

    /// Point at a different API host (GitHub Enterprise, test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl CommentSource for GithubCommentSource {
    fn list_comments(&self) -> anyhow::Result<Vec<String>> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("polgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;

        let mut bodies = Vec::new();
        let mut page = 1;
        loop {
            let url = format!(
                "{}/repos/{}/issues/{}/comments?per_page={}&page={}",
                self.api_base, self.repo, self.pr_number, PAGE_SIZE, page
            );
            let response = client
                .get(&url)
                .bearer_auth(&self.token)
                .header("Accept", "application/vnd.github+json")
                .send()
                .with_context(|| format!("fetch PR comments page {page}"))?
                .error_for_status()
                .with_context(|| format!("fetch PR comments page {page}"))?;

            let comments: Vec<IssueComment> =
                response.json().context("decode PR comments response")?;
            let count = comments.len();
            bodies.extend(comments.into_iter().filter_map(|c| c.body));

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        tracing::debug!(
            repo = %self.repo,
            pr = self.pr_number,
            comments = bodies.len(),
            "fetched PR comment history"
        );
        Ok(bodies)
    }
}
