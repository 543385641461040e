use std::collections::HashMap;

pub const MOST_COMMON_LIMIT: usize = 10;
pub const MIN_KEYWORD_CHARS: usize = 4;

/// Most frequent words across `texts`, case-insensitive.
///
/// The ten most common words are selected first and short words dropped
/// afterwards, so fewer than ten keywords may come back. Ties keep the order
/// in which the words first appeared.
pub fn common_keywords<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = texts.into_iter().collect::<Vec<_>>().join(" ").to_lowercase();

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in joined.split_whitespace().enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first_seen))| (word, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(MOST_COMMON_LIMIT)
        .filter(|(word, _, _)| word.chars().count() >= MIN_KEYWORD_CHARS)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

/// Merge per-restaurant keyword lists, ranking by how many lists mention a word.
pub fn merge_keywords<'a, I>(lists: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut position = 0;
    for list in lists {
        for word in list {
            counts.entry(word.as_str()).or_insert((0, position)).0 += 1;
            position += 1;
        }
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first_seen))| (word, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(word, _, _)| word.to_string())
        .collect()
}
