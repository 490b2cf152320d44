use serde::Serialize;

/// Default author name for history-creating commands
pub const DEFAULT_AUTHOR: &str = "user-test";

/// Default author email for history-creating commands
pub const DEFAULT_EMAIL: &str = "user-test@example.com";

/// Default branch created by the `init` shorthand
pub const DEFAULT_BRANCH: &str = "main";

/// Authorship and message for a commit, merge or annotated tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub message: String,
    pub author: String,
    pub email: String,
}

/// What an `add` command stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pathspec {
    /// Every tracked, modified and untracked path in the working tree
    All,
    /// A single path relative to the repository root
    File(String),
}

/// A tag to create at HEAD.
///
/// Lightweight tags have no annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCommand {
    pub name: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<CommitInfo>,
}

/// Canonical, fully-resolved repository mutation.
///
/// Serializes in the same keyed shape as the object form of the matching
/// event, with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Command {
    #[serde(rename = "init")]
    Init {
        #[serde(rename = "defaultBranch")]
        default_branch: String,
    },
    #[serde(rename = "commit")]
    Commit(CommitInfo),
    #[serde(rename = "branch")]
    Branch { name: String },
    #[serde(rename = "checkout")]
    Checkout {
        #[serde(rename = "ref")]
        reference: String,
    },
    #[serde(rename = "merge")]
    Merge {
        theirs: String,
        #[serde(flatten)]
        info: CommitInfo,
    },
    #[serde(rename = "tag")]
    Tag(TagCommand),
    #[serde(rename = "create file")]
    CreateFile { file: String, content: String },
    #[serde(rename = "change content")]
    ChangeContent { file: String, content: String },
    #[serde(rename = "add")]
    Add(Pathspec),
    #[serde(rename = "append content")]
    AppendContent {
        file: String,
        content: String,
        #[serde(rename = "newLine")]
        new_line: bool,
    },
}

impl Command {
    /// Whether executing this command creates a commit
    pub fn creates_commit(&self) -> bool {
        matches!(self, Command::Commit(_) | Command::Merge { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_serializes_keyed() {
        let cmd = Command::CreateFile {
            file: "a.txt".to_string(),
            content: "a.txt".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"create file": {"file": "a.txt", "content": "a.txt"}})
        );
    }

    #[test]
    fn test_lightweight_tag_has_no_message() {
        let cmd = Command::Tag(TagCommand {
            name: "v1.0".to_string(),
            annotation: None,
        });
        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({"tag": {"name": "v1.0"}})
        );
    }

    #[test]
    fn test_merge_flattens_commit_info() {
        let cmd = Command::Merge {
            theirs: "develop".to_string(),
            info: CommitInfo {
                message: "merge branch develop".to_string(),
                author: DEFAULT_AUTHOR.to_string(),
                email: DEFAULT_EMAIL.to_string(),
            },
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["merge"]["theirs"], "develop");
        assert_eq!(value["merge"]["author"], "user-test");
        assert!(cmd.creates_commit());
    }
}
