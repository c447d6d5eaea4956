use crate::chat::types::{ChatContext, IdentityOverride, Post};
use crate::watch::commits::CommitBlame;

/// Message posted when the first-ever evaluation finds only failures.
pub const BOOTSTRAP_MESSAGE: &str = "last build 3 build failed, please check";

/// Intended body for a failed commit lookup. It never reaches the channel: see
/// [`blame_body`].
pub const COMMIT_LOOKUP_APOLOGY: &str = "The last three builds on Jenkins failed, please check the commits. I was unable to get the information for you. Sorry.";

/// Alert for the first-ever evaluation. Posted under the bot's own identity,
/// unlike [`compose_blame`].
pub fn compose_bootstrap(context: &ChatContext) -> Post {
    Post {
        channel_id: context.channel_id.clone(),
        user_id: context.bot_user_id.clone(),
        message: BOOTSTRAP_MESSAGE.to_string(),
        identity: None,
    }
}

/// Alert for a newly finished build, posted under the blame identity.
pub fn compose_blame(
    context: &ChatContext,
    identity: IdentityOverride,
    test_lines: &[String],
    commits: &CommitBlame,
) -> Post {
    Post {
        channel_id: context.channel_id.clone(),
        user_id: context.bot_user_id.clone(),
        message: blame_body(test_lines, commits),
        identity: Some(identity),
    }
}

/// Body of a blame alert.
///
/// The apology for a failed commit lookup is superseded by the test/commit
/// composition, so a lookup failure without test lines yields an empty body.
/// Kept as-is until the intended wording is settled.
pub fn blame_body(test_lines: &[String], commits: &CommitBlame) -> String {
    if !commits.ok {
        tracing::warn!(
            superseded = COMMIT_LOOKUP_APOLOGY,
            "Commit lookup failed; alert goes out without commit attribution"
        );
    }

    if test_lines.is_empty() {
        commits.message.clone()
    } else {
        format!("{}\n\n{}", test_lines.join("\n"), commits.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ChatContext {
        ChatContext {
            team_id: "team1".to_string(),
            channel_id: "chan1".to_string(),
            bot_user_id: "bot1".to_string(),
        }
    }

    fn identity() -> IdentityOverride {
        IdentityOverride {
            username: "Burnning Jenkins".to_string(),
            icon_url: "https://icons.example.com/fire.png".to_string(),
        }
    }

    fn commits_ok(message: &str) -> CommitBlame {
        CommitBlame {
            message: message.to_string(),
            ok: true,
        }
    }

    fn commits_failed() -> CommitBlame {
        CommitBlame {
            message: String::new(),
            ok: false,
        }
    }

    #[test]
    fn test_bootstrap_post_has_no_identity_override() {
        let post = compose_bootstrap(&context());
        assert_eq!(post.message, BOOTSTRAP_MESSAGE);
        assert_eq!(post.identity, None);
        assert_eq!(post.channel_id, "chan1");
        assert_eq!(post.user_id, "bot1");
    }

    #[test]
    fn test_blame_post_joins_test_lines_and_commits() {
        let lines = vec!["line one".to_string(), "line two".to_string()];
        let post = compose_blame(&context(), identity(), &lines, &commits_ok("commits"));

        assert_eq!(post.message, "line one\nline two\n\ncommits");
        assert_eq!(post.identity, Some(identity()));
    }

    #[test]
    fn test_blame_body_without_test_lines_is_commit_message() {
        assert_eq!(blame_body(&[], &commits_ok("commits")), "commits");
    }

    #[test]
    fn test_commit_failure_drops_apology() {
        assert_eq!(blame_body(&[], &commits_failed()), "");

        let lines = vec!["line one".to_string()];
        assert_eq!(blame_body(&lines, &commits_failed()), "line one\n\n");
    }
}
