use docsearch_core::tokenizer::{tokenize, words, Tokenizer};

#[test]
fn it_normalizes_and_stems() {
    let toks = tokenize("Running Runners RUN! The menu.");
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // NFKC folds fullwidth letters
    assert_eq!(tokenize("ＣＡＣＨＥ"), tokenize("cache"));
}

#[test]
fn it_filters_stopwords() {
    let toks = tokenize("The quick brown fox and the lazy dog");
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
}

#[test]
fn it_splits_on_punctuation_and_markup() {
    let w = words("<h2>eZ-Publish 4.x</h2> kernel_settings, don't");
    assert_eq!(w, vec!["h2", "ez", "publish", "x", "h2", "kernel_settings", "don't"]);
}

#[test]
fn query_and_index_share_rules() {
    let t = Tokenizer::default();
    assert_eq!(t.tokenize("Templates"), t.tokenize("template"));
}
