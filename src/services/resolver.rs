//! Maps a GitHub repository link to the raw README locations worth trying.
//!
//! Two link shapes are understood:
//! - `{web}/{owner}/{repo}`: README at the repository root, `master` first then `main`.
//! - `{web}/{owner}/{repo}/blob/{branch}/{path...}` (or `/tree/`): README inside `path`,
//!   on the linked branch first, then `main` (or `master` when the link already says `main`).

pub const PRIMARY_BRANCH: &str = "master";
pub const FALLBACK_BRANCH: &str = "main";

/// Web and raw-content hosts. Overridable so tests can point both at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubHosts {
    web_base: String,
    raw_base: String,
}

impl GitHubHosts {
    pub fn new(web_base: &str, raw_base: &str) -> Self {
        Self {
            web_base: web_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn web_base(&self) -> &str {
        &self.web_base
    }

    pub fn raw_base(&self) -> &str {
        &self.raw_base
    }

    /// 取得網址在 web host 之後的路徑；不是此 host 的網址回傳 None
    pub fn repo_relative<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.web_base.as_str())?.strip_prefix('/')
    }

    pub fn repo_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/{}/{}", self.web_base, owner, repo)
    }
}

impl Default for GitHubHosts {
    fn default() -> Self {
        Self::new("https://github.com", "https://raw.githubusercontent.com")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 依序嘗試：主要分支，找不到時再試備用分支
    Candidates { primary: Candidate, fallback: Candidate },
    InvalidUrl,
}

pub fn alternate_branch(branch: &str) -> &'static str {
    if branch == FALLBACK_BRANCH {
        PRIMARY_BRANCH
    } else {
        FALLBACK_BRANCH
    }
}

pub fn resolve_readme(hosts: &GitHubHosts, url: &str) -> Resolution {
    let Some(relative) = hosts.repo_relative(url) else {
        return Resolution::InvalidUrl;
    };

    let path = relative
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Resolution::InvalidUrl;
    }

    match segments.as_slice() {
        [owner, repo] => {
            let raw = |branch: &str| Candidate {
                url: format!("{}/{}/{}/{}/README.md", hosts.raw_base(), owner, repo, branch),
                branch: branch.to_string(),
            };
            Resolution::Candidates {
                primary: raw(PRIMARY_BRANCH),
                fallback: raw(FALLBACK_BRANCH),
            }
        }
        [owner, repo, kind, branch, rest @ ..] if *kind == "blob" || *kind == "tree" => {
            let readme_path = if rest.is_empty() {
                "README.md".to_string()
            } else {
                format!("{}/README.md", rest.join("/"))
            };
            let raw = |branch: &str| Candidate {
                url: format!(
                    "{}/{}/{}/{}/{}",
                    hosts.raw_base(),
                    owner,
                    repo,
                    branch,
                    readme_path
                ),
                branch: branch.to_string(),
            };
            Resolution::Candidates {
                primary: raw(*branch),
                fallback: raw(alternate_branch(branch)),
            }
        }
        _ => Resolution::InvalidUrl,
    }
}
