use crate::config::HashtagConfig;

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `true` when every word of `keyword` appears as consecutive words of the title.
fn mentions(title_tokens: &[String], keyword: &str) -> bool {
    let kw = tokens(keyword);
    !kw.is_empty() && title_tokens.windows(kw.len()).any(|w| w == kw.as_slice())
}

/// Base tags followed by the tags of every topic the title mentions, without repeats and
/// capped at `cfg.max_tags`.
///
/// Keywords match whole words only, so a keyword like "it" does not fire on "with".
pub fn hashtags_for_title(title: &str, cfg: &HashtagConfig) -> Vec<String> {
    let title_tokens = tokens(title);
    let topic_tags = cfg
        .topics
        .iter()
        .filter(|topic| topic.keywords.iter().any(|k| mentions(&title_tokens, k)))
        .flat_map(|topic| topic.tags.iter());

    let mut out: Vec<String> = Vec::new();
    for tag in cfg.base.iter().chain(topic_tags) {
        if out.len() == cfg.max_tags {
            break;
        }
        if !out.contains(tag) {
            out.push(tag.clone());
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/publish/hashtags.rs"]
mod tests;
