//! Tokenizer and normalizer tests

use cascade_search::tokenizer::{tokenize, tokenize_document, STOP_WORDS};

#[test]
fn lowercases_and_splits_on_word_boundaries() {
    let tokens = tokenize("Machine Learning, Deep-Learning!");
    assert_eq!(tokens, vec!["machine", "learning", "deep", "learning"]);
}

#[test]
fn drops_tokens_of_length_two_or_less() {
    let tokens = tokenize("go to db io cat");
    assert_eq!(tokens, vec!["cat"]);
}

#[test]
fn drops_stop_words() {
    let tokens = tokenize("the cat and the hat are here");
    // "the", "and", "are" are stop words; "hat"/"cat"/"here" survive
    assert_eq!(tokens, vec!["cat", "hat", "here"]);
}

#[test]
fn strips_punctuation_inside_tokens() {
    let tokens = tokenize("rust's won't");
    // apostrophes split the words; fragments of length <= 2 disappear
    assert_eq!(tokens, vec!["rust", "won"]);
}

#[test]
fn empty_and_symbol_only_input_yield_no_tokens() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("!!! ??? ++").is_empty());
}

#[test]
fn title_tokens_precede_content_tokens() {
    let tokens = tokenize_document("Neural Networks", "learning algorithms");
    assert_eq!(tokens, vec!["neural", "networks", "learning", "algorithms"]);
}

#[test]
fn stop_word_list_is_filtered_entirely() {
    let joined = STOP_WORDS.join(" ");
    assert!(tokenize(&joined).is_empty());
}

#[test]
fn numbers_and_underscores_are_word_characters() {
    let tokens = tokenize("error_404 v2 build_2024");
    assert_eq!(tokens, vec!["error_404", "build_2024"]);
}
