use audex::{Catalog, Field, Record, SearchMode, SearchOptions};

fn fixture() -> Catalog {
    let catalog = Catalog::new();
    catalog.add_all(vec![
        Record::new("Love Me Do", "The Beatles", 142)
            .with_album("Please Please Me")
            .with_genre("Rock"),
        Record::new("Crazy Little Thing Called Love", "Queen", 163)
            .with_album("The Game")
            .with_genre("Rock"),
        Record::new("Lovely Day", "Bill Withers", 254)
            .with_album("Menagerie")
            .with_genre("Soul"),
        Record::new("Glove Box", "Loveless", 200).with_genre("Love Songs"),
        Record::new("Yesterday", "The Beatles", 125).with_album("Help!"),
    ]);
    catalog
}

fn ranked_titles(catalog: &Catalog, query: &str, options: &SearchOptions) -> Vec<String> {
    catalog
        .search_with(query, options)
        .into_iter()
        .map(|scored| scored.record.title().to_string())
        .collect()
}

#[test]
fn golden_exact_ranking() {
    let catalog = fixture();
    let titles = ranked_titles(&catalog, "love", &SearchOptions::new(SearchMode::Exact));

    // Title hits (1.0) ahead of the genre hit (0.4), ties in insertion order
    assert_eq!(
        titles,
        vec!["Love Me Do", "Crazy Little Thing Called Love", "Glove Box"]
    );
}

#[test]
fn golden_prefix_ranking() {
    let catalog = fixture();
    let results = catalog.search_with("love", &SearchOptions::new(SearchMode::Prefix));

    let titles: Vec<&str> = results.iter().map(|s| s.record.title()).collect();
    // Glove Box: "loveless" artist 0.64 + "love" genre 0.32
    assert_eq!(
        titles,
        vec![
            "Glove Box",
            "Love Me Do",
            "Crazy Little Thing Called Love",
            "Lovely Day"
        ]
    );
    assert!((results[0].score - 0.96).abs() < 1e-9);
    assert!((results[1].score - 0.8).abs() < 1e-9);
}

#[test]
fn golden_substring_ranking() {
    let catalog = fixture();
    let results = catalog.search_with("love", &SearchOptions::new(SearchMode::Substring));

    let top = &results[0];
    // glove (0.6) + loveless (0.64) + love (0.32)
    assert_eq!(top.record.title(), "Glove Box");
    assert!((top.score - 1.56).abs() < 1e-9);
    assert_eq!(results.len(), 4);
}

#[test]
fn golden_field_restriction() {
    let catalog = fixture();
    let options = SearchOptions::new(SearchMode::Exact).only_fields(&[Field::Artist]);

    let titles = ranked_titles(&catalog, "beatles", &options);
    assert_eq!(titles, vec!["Love Me Do", "Yesterday"]);

    let options = SearchOptions::new(SearchMode::Exact).only_fields(&[Field::Title]);
    assert!(ranked_titles(&catalog, "beatles", &options).is_empty());
}

#[test]
fn golden_fuzzy_ranking() {
    let catalog = fixture();
    let results = catalog.search_with("yesterdy", &SearchOptions::new(SearchMode::Fuzzy));

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].record.title(), "Yesterday");
    // one deletion over nine characters
    let expected = (1.0 - 1.0 / 9.0) * 0.4;
    assert!((results[0].score - expected).abs() < 1e-9);
}

#[test]
fn golden_regex_ranking() {
    let catalog = fixture();
    let titles = ranked_titles(
        &catalog,
        "^(please|help)",
        &SearchOptions::new(SearchMode::Regex),
    );
    assert_eq!(titles, vec!["Love Me Do", "Yesterday"]);
}

#[test]
fn golden_limits() {
    let catalog = fixture();
    let options = SearchOptions::new(SearchMode::Exact).with_max_results(1);
    assert_eq!(ranked_titles(&catalog, "love", &options), vec!["Love Me Do"]);

    let options = SearchOptions::new(SearchMode::Exact).with_min_relevance(0.5);
    assert_eq!(ranked_titles(&catalog, "love", &options).len(), 2);
}
