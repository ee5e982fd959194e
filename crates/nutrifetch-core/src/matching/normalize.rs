/// Lower-cases `text`, drops everything except `a-z`, `0-9` and the space
/// character, then collapses whitespace runs and trims.
///
/// Tabs and newlines are dropped rather than turned into spaces.
pub fn normalize(text: &str) -> String {
    let kept = text
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || *ch == ' ')
        .collect::<String>();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                output.extend(ch.to_lowercase());
            } else {
                output.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            output.push(ch);
            in_word = false;
        }
    }

    output
}
