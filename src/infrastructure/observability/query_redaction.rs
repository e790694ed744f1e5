const MAX_VISIBLE_CHARS: usize = 100;
const MIN_CARD_DIGITS: usize = 12;

/// Renders a user query in a form that is safe to put in logs.
pub fn redact_query(query: &str) -> String {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let char_count = trimmed.chars().count();
    let visible = if char_count > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", head, char_count)
    } else {
        trimmed.to_string()
    };

    mask_card_numbers(&redact_secrets(&visible))
}

fn redact_secrets(text: &str) -> String {
    let patterns = [
        ("Bearer ", "Bearer [REDACTED]"),
        ("api_key=", "api_key=[REDACTED]"),
        ("password=", "password=[REDACTED]"),
        ("token=", "token=[REDACTED]"),
        ("secret=", "secret=[REDACTED]"),
    ];

    let mut result = text.to_string();
    for (pattern, replacement) in patterns {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(pattern) {
            let start = search_from + found;
            let value_start = start + pattern.len();
            let end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| value_start + i)
                .unwrap_or(result.len());
            result.replace_range(start..end, replacement);
            search_from = start + replacement.len();
        }
    }

    result
}

/// Keeps the last four digits of anything that looks like a card number.
/// Spaces and dashes between digit groups count as part of the number.
fn mask_card_numbers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            output.push(chars[i]);
            i += 1;
            continue;
        }

        let mut end = i;
        let mut digits = 0;
        let mut last_digit = i;
        while end < chars.len() {
            let c = chars[end];
            if c.is_ascii_digit() {
                digits += 1;
                last_digit = end;
            } else if !(c == ' ' || c == '-')
                || !chars.get(end + 1).is_some_and(char::is_ascii_digit)
            {
                break;
            }
            end += 1;
        }
        let run = &chars[i..=last_digit];

        if digits >= MIN_CARD_DIGITS {
            let mut remaining = digits;
            for &c in run {
                if c.is_ascii_digit() {
                    output.push(if remaining > 4 { '*' } else { c });
                    remaining -= 1;
                } else {
                    output.push(c);
                }
            }
        } else {
            output.extend(run);
        }
        i = last_digit + 1;
    }

    output
}
