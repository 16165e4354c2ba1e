//! The `/generate` command: parse the request, run the job, reply.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::notegpt::{GeneratedTrack, NotegptClient};
use crate::error::GenerateError;

use super::Command;

/// Reply for a `/generate` with nothing to work with
const USAGE: &str = "Usage: /generate <theme> | optionally add lyrics after '||' e.g. /generate Cinematic || some lyrics";

/// Separator between the theme prompt and optional lyrics
const LYRICS_DELIMITER: &str = "||";

/// A parsed generation request: theme prompt plus optional lyrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRequest {
    pub prompt: String,
    pub lyrics: String,
}

/// Split the raw argument text into prompt and lyrics.
///
/// Whitespace runs collapse to single spaces, then the text splits once on
/// the first `||`; both halves are trimmed. `None` means there is nothing to
/// generate and the caller should reply with the usage line.
pub fn parse_request(raw: &str) -> Option<TrackRequest> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }

    let (prompt, lyrics) = match text.split_once(LYRICS_DELIMITER) {
        Some((prompt, lyrics)) => (prompt.trim(), lyrics.trim()),
        None => (text.as_str(), ""),
    };

    if prompt.is_empty() {
        return None;
    }

    Some(TrackRequest {
        prompt: prompt.to_string(),
        lyrics: lyrics.to_string(),
    })
}

/// Render the outcome of a generation run as the reply text.
///
/// An empty music URL counts as absent and gets the fallback line.
pub fn render_outcome(outcome: &Result<GeneratedTrack, GenerateError>) -> String {
    match outcome {
        Err(reason) => format!("Error: {}", reason),
        Ok(track) => match track.music_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => format!("Your track is ready: {}", url),
            None => "No music URL returned by the service.".to_string(),
        },
    }
}

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    client: Arc<NotegptClient>,
    config: Arc<Config>,
) -> ResponseResult<()> {
    let Command::Generate(args) = cmd;

    let Some(request) = parse_request(&args) else {
        bot.send_message(msg.chat.id, USAGE).await?;
        return Ok(());
    };

    info!("Generation requested in chat {}: {}", msg.chat.id, request.prompt);
    bot.send_message(
        msg.chat.id,
        format!(
            "Starting generation for: {}\nThis may take a minute or two...",
            request.prompt
        ),
    )
    .await?;

    let outcome = client
        .submit_and_await(&request.prompt, &request.lyrics, config.job_timeout())
        .await;
    debug!("Generation outcome for chat {}: {:?}", msg.chat.id, outcome);

    bot.send_message(msg.chat.id, render_outcome(&outcome)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_prompt_and_lyrics_on_the_delimiter() {
        let request = parse_request("Cinematic || some lyrics").unwrap();
        assert_eq!(request.prompt, "Cinematic");
        assert_eq!(request.lyrics, "some lyrics");
    }

    #[test]
    fn collapses_whitespace_before_splitting() {
        let request = parse_request("  epic   orchestral \n score  ||  verse   one ").unwrap();
        assert_eq!(request.prompt, "epic orchestral score");
        assert_eq!(request.lyrics, "verse one");
    }

    #[test]
    fn lyrics_default_to_empty_without_a_delimiter() {
        let request = parse_request("Upbeat synthwave").unwrap();
        assert_eq!(request.prompt, "Upbeat synthwave");
        assert_eq!(request.lyrics, "");
    }

    #[test]
    fn only_the_first_delimiter_splits() {
        let request = parse_request("a || b || c").unwrap();
        assert_eq!(request.prompt, "a");
        assert_eq!(request.lyrics, "b || c");
    }

    #[test]
    fn delimiter_without_surrounding_spaces_still_splits() {
        let request = parse_request("Cinematic||some lyrics").unwrap();
        assert_eq!(request.prompt, "Cinematic");
        assert_eq!(request.lyrics, "some lyrics");
    }

    #[test]
    fn empty_arguments_are_rejected() {
        assert!(parse_request("").is_none());
        assert!(parse_request("   ").is_none());
    }

    #[test]
    fn empty_prompt_before_the_delimiter_is_rejected() {
        assert!(parse_request("|| lyrics only").is_none());
    }

    #[test]
    fn failure_reasons_render_with_an_error_prefix() {
        assert_eq!(
            render_outcome(&Err(GenerateError::AuthFailed)),
            "Error: Auth Failed. Cookies expired or invalid."
        );
        assert_eq!(
            render_outcome(&Err(GenerateError::StartFailed)),
            "Error: Failed to start generation."
        );
        assert_eq!(
            render_outcome(&Err(GenerateError::MissingJobId)),
            "Error: Server did not return a Task ID."
        );
        assert_eq!(
            render_outcome(&Err(GenerateError::GenerationFailed)),
            "Error: Generation Failed."
        );
        assert_eq!(
            render_outcome(&Err(GenerateError::Timeout)),
            "Error: Timeout: The AI took too long."
        );
    }

    #[test]
    fn success_without_a_url_renders_the_fallback_line() {
        let outcome = Ok(GeneratedTrack {
            music_url: None,
            thumbnail_url: Some("https://cdn.example/cover.jpg".to_string()),
        });
        assert_eq!(render_outcome(&outcome), "No music URL returned by the service.");
    }

    #[test]
    fn empty_url_success_renders_the_fallback_line() {
        let outcome = Ok(GeneratedTrack {
            music_url: Some(String::new()),
            thumbnail_url: None,
        });
        assert_eq!(render_outcome(&outcome), "No music URL returned by the service.");
    }

    #[test]
    fn success_renders_the_track_link() {
        let outcome = Ok(GeneratedTrack {
            music_url: Some("https://cdn.example/track.mp3".to_string()),
            thumbnail_url: None,
        });
        assert_eq!(render_outcome(&outcome), "Your track is ready: https://cdn.example/track.mp3");
    }
}
