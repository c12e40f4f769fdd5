use std::collections::{HashMap, HashSet};

use crate::models::{CommentInsight, KeywordCount, Sentiment};

pub const DEFAULT_MIN_FREQ: usize = 2;

pub const STOP_WORDS: &[&str] = &[
    "a", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "até",
    "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois",
    "do", "dos", "e", "ela", "elas", "ele", "eles", "em", "entre", "era",
    "eram", "éramos", "essa", "essas", "esse", "esses", "esta", "estas", "este",
    "estes", "eu", "foi", "fomos", "for", "foram", "fui", "há", "isso",
    "isto", "já", "lhe", "lhes", "mais", "mas", "me", "mesmo", "meu",
    "meus", "minha", "minhas", "muito", "muitos", "na", "não", "nas", "nem",
    "no", "nos", "nós", "nossa", "nossas", "nosso", "nossos", "num", "numa",
    "o", "os", "ou", "para", "pela", "pelas", "pelo", "pelos", "por",
    "qual", "quando", "que", "quem", "são", "se", "seja", "sem", "seu",
    "seus", "só", "somos", "sou", "sua", "suas", "também", "te", "tem",
    "tém", "temos", "tenho", "teu", "teus", "tu", "tua", "tuas", "um",
    "uma", "você", "vocês", "vos",
];

pub const POSITIVE_WORDS: &[&str] = &[
    "bom", "ótimo", "excelente", "incrível", "maravilhoso", "fantástico",
    "adorei", "gostei", "satisfeito", "feliz", "contente", "positivo",
    "recomendo", "aprovado", "agradável", "melhor", "tranquilo",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "ruim", "péssimo", "terrível", "horrível", "detestei", "odiei",
    "decepcionado", "insatisfeito", "triste", "infeliz", "negativo",
    "não recomendo", "reprovado", "desagradável", "pior", "estressante",
    "problema", "difícil", "complicado", "fraco", "errado",
];

/// Lowercase, then drop punctuation and digits. Whitespace is kept so token
/// boundaries survive; punctuation between letters joins them.
pub fn normalize(comment: &str) -> String {
    comment
        .to_lowercase()
        .chars()
        .filter(|c| c.is_whitespace() || ((c.is_alphanumeric() || *c == '_') && !c.is_numeric()))
        .collect()
}

/// Tokens of two or more characters with stop words removed.
fn tokenize(normalized: &str, stop: &HashSet<&str>) -> Vec<String> {
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() >= 2 && !stop.contains(*t))
        .map(String::from)
        .collect()
}

/// Unigrams followed by bigrams of adjacent kept tokens.
fn terms(tokens: &[String]) -> Vec<String> {
    let mut out: Vec<String> = tokens.to_vec();
    out.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    out
}

/// Frequent unigrams and bigrams across comments.
///
/// A term is kept when it appears in at least `min_freq` distinct comments;
/// its reported count is the total number of occurrences. Results are
/// ordered by count descending, then alphabetically.
pub fn extract_keywords<'a, I>(comments: I, min_freq: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let mut totals: HashMap<String, usize> = HashMap::new();
    let mut documents: HashMap<String, usize> = HashMap::new();

    for comment in comments {
        let tokens = tokenize(&normalize(comment), &stop);
        let mut seen: HashSet<String> = HashSet::new();
        for term in terms(&tokens) {
            *totals.entry(term.clone()).or_insert(0) += 1;
            if seen.insert(term.clone()) {
                *documents.entry(term).or_insert(0) += 1;
            }
        }
    }

    let mut keywords: Vec<KeywordCount> = totals
        .into_iter()
        .filter(|(term, _)| documents.get(term).copied().unwrap_or(0) >= min_freq)
        .map(|(term, count)| KeywordCount { term, count })
        .collect();
    keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    keywords
}

fn matches(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| text.contains(*w)).count()
}

/// Keyword-list sentiment. Each list entry counts once when it occurs
/// anywhere in the lowercased text, including inside longer words.
pub fn classify_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let positive = matches(&lower, POSITIVE_WORDS);
    let negative = matches(&lower, NEGATIVE_WORDS);

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn score_comments<'a, I>(comments: I) -> Vec<CommentInsight>
where
    I: IntoIterator<Item = &'a str>,
{
    comments
        .into_iter()
        .map(|text| CommentInsight {
            text: text.to_string(),
            length: text.chars().count(),
            sentiment: classify_sentiment(text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword_map(list: &[KeywordCount]) -> HashMap<&str, usize> {
        list.iter().map(|k| (k.term.as_str(), k.count)).collect()
    }

    #[test]
    fn normalization_strips_punctuation_and_digits() {
        assert_eq!(normalize("Salário BAIXO, 2 anos!"), "salário baixo  anos");
    }

    #[test]
    fn keeps_terms_seen_in_enough_comments() {
        let comments = [
            "O salário baixo foi o problema",
            "Salário baixo e falta de plano de carreira",
            "Gostei da equipe, mas salário baixo",
            "Equipe unida",
        ];
        let keywords = extract_keywords(comments, 2);
        let map = keyword_map(&keywords);

        assert_eq!(map.get("salário"), Some(&3));
        assert_eq!(map.get("baixo"), Some(&3));
        assert_eq!(map.get("salário baixo"), Some(&3));
        assert_eq!(map.get("equipe"), Some(&2));
        assert!(!map.contains_key("problema"));
        assert!(!map.contains_key("carreira"));
        assert_eq!(keywords[0].count, 3);
        assert_eq!(keywords[0].term, "baixo");
    }

    #[test]
    fn never_returns_stop_words_or_rare_terms() {
        let comments = [
            "que de para com uma gestão",
            "que de para com uma gestão ruim",
            "que para",
        ];
        let keywords = extract_keywords(comments, 2);
        for k in &keywords {
            for word in k.term.split(' ') {
                assert!(!STOP_WORDS.contains(&word), "stop word {word} leaked");
            }
        }
        let map = keyword_map(&keywords);
        assert_eq!(map.get("gestão"), Some(&2));
        assert!(!map.contains_key("ruim"));
        assert!(!map.contains_key("gestão ruim"));
    }

    #[test]
    fn counts_repeated_terms_within_a_comment() {
        let keywords = extract_keywords(["chefe chefe chefe", "chefe ausente"], 2);
        assert_eq!(keyword_map(&keywords).get("chefe"), Some(&4));
    }

    #[test]
    fn empty_input_gives_no_keywords() {
        assert!(extract_keywords(Vec::<&str>::new(), 2).is_empty());
        assert!(extract_keywords(["um só comentário"], 2).is_empty());
    }

    #[test]
    fn output_order_is_deterministic() {
        let comments = ["beta alfa", "alfa beta", "gama", "gama"];
        let first = extract_keywords(comments, 2);
        let second = extract_keywords(comments, 2);
        assert_eq!(first, second);
        let terms: Vec<&str> = first.iter().map(|k| k.term.as_str()).collect();
        assert_eq!(terms, vec!["alfa", "beta", "gama"]);
    }

    #[test]
    fn sentiment_labels_follow_word_counts() {
        assert_eq!(classify_sentiment("Ambiente excelente, gostei"), Sentiment::Positive);
        assert_eq!(classify_sentiment("Gestão ruim e salário péssimo"), Sentiment::Negative);
        assert_eq!(classify_sentiment("Bom salário, chefe ruim"), Sentiment::Neutral);
        assert_eq!(classify_sentiment("Nada a declarar"), Sentiment::Neutral);
    }

    #[test]
    fn sentiment_matches_inside_longer_words() {
        // "bom" inside "bomba", "pior" inside "piorou".
        assert_eq!(classify_sentiment("bomba"), Sentiment::Positive);
        assert_eq!(classify_sentiment("tudo piorou"), Sentiment::Negative);
        // "não recomendo" also contains the positive "recomendo".
        assert_eq!(classify_sentiment("Não recomendo"), Sentiment::Neutral);
    }

    #[test]
    fn scored_comments_keep_text_and_length() {
        let scored = score_comments(["Ótimo lugar"]);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].length, 11);
        assert_eq!(scored[0].sentiment, Sentiment::Positive);
    }
}
