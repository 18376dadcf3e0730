use crate::structs::starboard::ResolvedMessage;

/// Discord's hard message limit, counted in codepoints.
pub const MAX_MIRROR_CHARS: usize = 2000;

/// Tier icon by star count. Five contiguous bands covering every count.
pub fn star_emoji(stars: u64) -> &'static str {
    match stars {
        0..=5 => "\u{2b50}",            // ⭐
        6..=10 => "\u{1f31f}",          // 🌟
        11..=25 => "\u{1f4ab}",         // 💫
        26..=50 => "\u{2728}",          // ✨
        _ => "\u{1f320}",               // 🌠
    }
}

fn clean_content(content: &str) -> String {
    // keep mass pings inert inside the board channel
    content
        .replace("@everyone", "@\u{200b}everyone")
        .replace("@here", "@\u{200b}here")
}

/// Builds the one-line board entry for a message at the given star count.
///
/// Returns `None` when the result would not fit in a single message; the
/// caller must reject the operation rather than truncate.
pub fn render(message: &ResolvedMessage, stars: u64, message_id: u64) -> Option<String> {
    let mut content = clean_content(&message.content);
    if let Some(url) = &message.attachment_url {
        let attachment = format!("(attachment: {url})");
        if content.is_empty() {
            content = attachment;
        } else {
            content = format!("{content} {attachment}");
        }
    }

    let base = if stars > 1 {
        format!("{} **{}**", star_emoji(stars), stars)
    } else {
        star_emoji(stars).to_string()
    };

    let line = format!(
        "{} {} - {} by {} in <#{}> (ID: {})",
        base,
        content,
        message.timestamp.format("%Y-%m-%d %H:%M UTC"),
        message.author_name,
        message.channel_id,
        message_id,
    );

    if line.chars().count() > MAX_MIRROR_CHARS {
        return None;
    }
    Some(line)
}
