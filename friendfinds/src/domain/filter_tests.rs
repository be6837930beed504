//! Tests for the filter engine.

use rstest::{fixture, rstest};

use super::*;
use crate::test_support::{RecommendationFixture, date};

#[fixture]
fn tako() -> Recommendation {
    RecommendationFixture::new("1", "Tako Sushi")
        .category("Restaurants")
        .friend("Ana")
        .on("2024-01-05")
        .build()
}

#[fixture]
fn library() -> Vec<Recommendation> {
    vec![
        RecommendationFixture::new("3", "Dune")
            .category("Books")
            .friend("Ben")
            .notes("Read the appendix first")
            .on("2024-03-10")
            .used(true)
            .build(),
        RecommendationFixture::new("2", "Joe's Plumbing")
            .category("Plumbers")
            .friend("Ana")
            .on("2024-02-01")
            .build(),
        RecommendationFixture::new("1", "Tako Sushi")
            .category("Restaurants")
            .friend("Ana")
            .notes("Ask for the omakase")
            .on("2024-01-05")
            .build(),
        RecommendationFixture::new("4", "Pasta Bar")
            .category("Restaurants")
            .friend("Carla")
            .on("2023-12-24")
            .used(true)
            .build(),
    ]
}

fn ids(records: &[&Recommendation]) -> Vec<String> {
    records.iter().map(|r| r.id.to_string()).collect()
}

#[rstest]
fn search_is_case_insensitive(tako: Recommendation) {
    let records = vec![tako];
    let spec = FilterSpec::default().with_search_term("tako");

    assert_eq!(ids(&apply(&records, &spec)), vec!["1"]);
}

#[rstest]
fn used_status_excludes_unused_records(tako: Recommendation) {
    let records = vec![tako];
    let spec = FilterSpec::default().with_status(StatusFilter::Used);

    assert!(apply(&records, &spec).is_empty());
}

#[rstest]
fn date_range_start_after_record_excludes_it(tako: Recommendation) {
    let records = vec![tako];
    let spec =
        FilterSpec::default().with_date_range(DateRange::new(Some(date("2024-01-06")), None));

    assert!(apply(&records, &spec).is_empty());
}

#[rstest]
#[case::title("dune", vec!["3"])]
#[case::category("RESTAUR", vec!["1", "4"])]
#[case::friend("carla", vec!["4"])]
#[case::notes("omakase", vec!["1"])]
#[case::no_match("zzz", vec![])]
fn search_covers_every_text_field(
    library: Vec<Recommendation>,
    #[case] term: &str,
    #[case] expected: Vec<&str>,
) {
    let spec = FilterSpec::default().with_search_term(term);
    assert_eq!(ids(&apply(&library, &spec)), expected);
}

#[rstest]
fn missing_notes_do_not_match_but_other_fields_still_can() {
    let records = vec![
        RecommendationFixture::new("1", "Notes live here")
            .notes("nothing")
            .build(),
        RecommendationFixture::new("2", "Bare").build(),
    ];
    let spec = FilterSpec::default().with_search_term("notes");

    assert_eq!(ids(&apply(&records, &spec)), vec!["1"]);
}

#[rstest]
#[case::all(CategoryFilter::All, vec!["3", "2", "1", "4"])]
#[case::exact(CategoryFilter::Exact("Restaurants".to_owned()), vec!["1", "4"])]
#[case::case_sensitive(CategoryFilter::Exact("restaurants".to_owned()), vec![])]
fn category_clause_is_exact(
    library: Vec<Recommendation>,
    #[case] category: CategoryFilter,
    #[case] expected: Vec<&str>,
) {
    let spec = FilterSpec::default().with_category(category);
    assert_eq!(ids(&apply(&library, &spec)), expected);
}

#[rstest]
#[case::all(StatusFilter::All, vec!["3", "2", "1", "4"])]
#[case::used(StatusFilter::Used, vec!["3", "4"])]
#[case::unused(StatusFilter::Unused, vec!["2", "1"])]
fn status_clause_matches_flag(
    library: Vec<Recommendation>,
    #[case] status: StatusFilter,
    #[case] expected: Vec<&str>,
) {
    let spec = FilterSpec::default().with_status(status);
    assert_eq!(ids(&apply(&library, &spec)), expected);
}

#[rstest]
#[case::open(None, None, vec!["3", "2", "1", "4"])]
#[case::inclusive_start(Some("2024-01-05"), None, vec!["3", "2", "1"])]
#[case::inclusive_end(None, Some("2024-01-05"), vec!["1", "4"])]
#[case::single_day(Some("2024-02-01"), Some("2024-02-01"), vec!["2"])]
#[case::inverted(Some("2024-03-01"), Some("2024-01-01"), vec![])]
fn date_range_bounds_are_inclusive(
    library: Vec<Recommendation>,
    #[case] start: Option<&str>,
    #[case] end: Option<&str>,
    #[case] expected: Vec<&str>,
) {
    let range = DateRange::new(start.map(date), end.map(date));
    let spec = FilterSpec::default().with_date_range(range);
    assert_eq!(ids(&apply(&library, &spec)), expected);
}

#[rstest]
fn clauses_compose_with_and(library: Vec<Recommendation>) {
    let spec = FilterSpec::default()
        .with_category(CategoryFilter::Exact("Restaurants".to_owned()))
        .with_friend(Some("Ana".to_owned()))
        .with_status(StatusFilter::Unused);

    let output = apply(&library, &spec);
    assert_eq!(ids(&output), vec!["1"]);

    for record in &library {
        let independently = spec.category.matches(&record.category)
            && spec.status.matches(record.used)
            && spec.friend.as_deref() == Some(record.friend_name.as_str());
        assert_eq!(
            output.iter().any(|r| r.id == record.id),
            independently,
            "record {} membership must equal the AND of its clauses",
            record.id
        );
    }
}

#[rstest]
fn output_is_an_ordered_subsequence(library: Vec<Recommendation>) {
    let spec = FilterSpec::default().with_search_term("a");
    let output = apply(&library, &spec);

    let mut cursor = library.iter();
    for kept in output {
        assert!(
            cursor.any(|candidate| candidate.id == kept.id),
            "filter output must preserve input order"
        );
    }
}

#[rstest]
fn empty_cache_yields_empty_output_for_any_filter() {
    let spec = FilterSpec::default().with_search_term("anything");
    assert!(apply(&[], &spec).is_empty());
    assert!(apply(&[], &FilterSpec::default()).is_empty());
}

#[rstest]
fn categories_are_distinct(library: Vec<Recommendation>) {
    let found = categories(&library);
    assert_eq!(found, vec!["Books", "Plumbers", "Restaurants"]);
}

#[rstest]
fn friends_are_distinct_sorted_and_non_empty(mut library: Vec<Recommendation>) {
    library.push(RecommendationFixture::new("5", "Nameless").friend("").build());
    assert_eq!(friends(&library), vec!["Ana", "Ben", "Carla"]);
}

#[rstest]
fn category_options_append_custom_categories_to_defaults(library: Vec<Recommendation>) {
    let options = category_options(&library);

    assert_eq!(options.len(), DEFAULT_CATEGORIES.len() + 1);
    assert_eq!(options.last().map(String::as_str), Some("Books"));
    assert_eq!(
        options.iter().filter(|c| c.as_str() == "Restaurants").count(),
        1
    );
}

#[rstest]
#[case::empty_cache(false, Some(EmptyState::NoRecommendations))]
#[case::nothing_matches(true, Some(EmptyState::NoMatches))]
fn empty_results_are_classified(
    library: Vec<Recommendation>,
    #[case] populated: bool,
    #[case] expected: Option<EmptyState>,
) {
    let records = if populated { library } else { Vec::new() };
    let spec = FilterSpec::default().with_search_term("no such thing");

    let view = visible(&records, &spec);
    assert!(view.items.is_empty());
    assert_eq!(view.empty_state, expected);
}

#[rstest]
fn non_empty_results_have_no_empty_state(library: Vec<Recommendation>) {
    let view = visible(&library, &FilterSpec::default());
    assert_eq!(view.items.len(), library.len());
    assert!(view.empty_state.is_none());
}

#[rstest]
#[case("all", StatusFilter::All)]
#[case("used", StatusFilter::Used)]
#[case("unused", StatusFilter::Unused)]
fn status_selectors_parse(#[case] raw: &str, #[case] expected: StatusFilter) {
    assert_eq!(raw.parse::<StatusFilter>(), Ok(expected));
    assert_eq!(expected.to_string(), raw);
}

#[rstest]
fn unknown_status_selector_is_rejected() {
    let err = "maybe".parse::<StatusFilter>().expect_err("unknown status");
    assert!(err.to_string().contains("maybe"));
}
