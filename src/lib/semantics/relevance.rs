extern crate ngrammatic;

use self::ngrammatic::{CorpusBuilder, Pad};

/// Best fuzzy match for a misspelled name among the names in scope.
pub fn closest_match<'a, I: IntoIterator<Item = &'a str>>(candidates: I, name: &str) -> Option<String> {
    let mut corpus = CorpusBuilder::new().arity(2).pad_full(Pad::Auto).finish();

    for candidate in candidates {
        corpus.add_text(candidate);
    }

    corpus
        .search(name, 0.3f32)
        .into_iter()
        .next()
        .map(|result| result.text)
}
