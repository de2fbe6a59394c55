/// 按字符（而非字节）截取前 `max_chars` 个字符，避免截断多字节字符
pub fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &content[..byte_index],
        None => content,
    }
}

/// 名称与查询是否相同（去除首尾空白，按Unicode忽略大小写）
pub fn is_same_name(name: &str, query: &str) -> bool {
    name.trim().to_lowercase() == query.trim().to_lowercase()
}

/// 将模型返回的文本按行解析为名称列表
///
/// 每行去除首尾空白，丢弃空行、与查询本身（忽略大小写）相同的行，
/// 以及字符数少于 `min_chars` 的行，最后截取前 `limit` 个。
/// 不做去重，保留模型输出的顺序。
pub fn parse_name_lines(text: &str, query: &str, min_chars: usize, limit: usize) -> Vec<String> {
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| !is_same_name(name, query))
        .filter(|name| name.chars().count() >= min_chars)
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_input() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("你好世界", 2), "你好");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_truncate_chars_exact_budget() {
        let page = "x".repeat(5000);
        assert_eq!(truncate_chars(&page, 1500).chars().count(), 1500);
    }

    #[test]
    fn test_parse_name_lines_filters_query_and_blanks() {
        let text = "\n  Microsoft Teams \n\nslack\nDiscord\n   \nZoom\n";
        let names = parse_name_lines(text, "Slack", 1, 5);
        assert_eq!(names, vec!["Microsoft Teams", "Discord", "Zoom"]);
    }

    #[test]
    fn test_is_same_name_ignores_unicode_case() {
        assert!(is_same_name("ÉVERNOTE", " évernote "));
        assert!(is_same_name("Slack", "SLACK"));
        assert!(!is_same_name("Slack Huddles", "Slack"));
    }

    #[test]
    fn test_parse_name_lines_drops_non_ascii_query() {
        let names = parse_name_lines("ÉVERNOTE
Notion", "évernote", 1, 5);
        assert_eq!(names, vec!["Notion"]);
    }

    #[test]
    fn test_parse_name_lines_keeps_duplicates_and_order() {
        let names = parse_name_lines("Zoom\nDiscord\nZoom", "Slack", 1, 5);
        assert_eq!(names, vec!["Zoom", "Discord", "Zoom"]);
    }

    #[test]
    fn test_parse_name_lines_caps_and_min_length() {
        let text = "A\nBB\nAsana\nHubSpot\nZendesk\nNotion\nTrello\nJira";
        let names = parse_name_lines(text, "Monday", 3, 4);
        assert_eq!(names, vec!["Asana", "HubSpot", "Zendesk", "Notion"]);
    }
}
