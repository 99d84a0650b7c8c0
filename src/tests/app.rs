use crate::app::{App, BrowseEntry, SearchRequest};
use crate::search::SearchHit;
use crate::service::{PhraseService, ServiceOptions};
use crate::tests::support::{HashingEncoder, MapFetcher, PrefixLemmatizer};

const CREDITS: &str = "phrase,topics,topics2,comment
Да/Ага,Согласие,,
Хочу погасить кредит,Кредиты,Погашение,nan
Кредитные карты,Карты,,Уточнить лимит
Нет,Отказ,,
";

const SMALL_TALK: &str = "phrase,topics,comment
Пока,Прощание,
Да/Ага, согласие ,Повтор
";

fn create_app() -> App {
    let service = PhraseService::new(
        Box::new(HashingEncoder::new(64)),
        Box::new(PrefixLemmatizer),
        ServiceOptions::default(),
    );
    let fetcher = MapFetcher::new()
        .with("credits.csv", CREDITS)
        .with("small-talk.csv", SMALL_TALK);
    let sources = vec![
        "credits.csv".to_string(),
        "missing.csv".to_string(),
        "small-talk.csv".to_string(),
    ];

    App::load_with(service, &fetcher, &sources).unwrap()
}

fn request(query: &str) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        top_k: 5,
        threshold: 0.5,
        topics: vec![],
        only_in_topics: false,
        filter_results: false,
    }
}

fn phrases(hits: &[SearchHit]) -> Vec<&str> {
    hits.iter().map(SearchHit::phrase).collect()
}

#[test]
fn test_expanded_variants_collapse_to_one_result() {
    let app = create_app();
    assert_eq!(app.table().len(), 8);

    let output = app.search(&request("Да")).unwrap();

    assert_eq!(phrases(&output.semantic), vec!["Да/Ага"]);
    assert!((output.semantic[0].score() - 1.0).abs() < 1e-6);
    assert_eq!(output.semantic[0].topics(), ["Согласие"]);
    assert!(matches!(output.semantic[0], SearchHit::Scored { .. }));

    assert_eq!(phrases(&output.keyword), vec!["Да/Ага"]);
    assert!(matches!(output.keyword[0], SearchHit::Unscored { .. }));
}

#[test]
fn test_partial_word_overlap() {
    let app = create_app();
    let output = app.search(&request("хочу кредит")).unwrap();

    assert_eq!(phrases(&output.semantic), vec!["Хочу погасить кредит"]);
    let expected = 2.0 / (2.0_f32.sqrt() * 3.0_f32.sqrt());
    assert!((output.semantic[0].score() - expected).abs() < 1e-5);

    assert_eq!(phrases(&output.keyword), vec!["Хочу погасить кредит"]);
    assert_eq!(output.keyword[0].topics(), ["Кредиты", "Погашение"]);
}

#[test]
fn test_threshold_and_top_k_overrides() {
    let app = create_app();

    let mut strict = request("хочу кредит");
    strict.threshold = 0.9;
    assert!(app.search(&strict).unwrap().semantic.is_empty());

    let mut none = request("да");
    none.top_k = 0;
    let output = app.search(&none).unwrap();
    assert!(output.semantic.is_empty());
    assert_eq!(phrases(&output.keyword), vec!["Да/Ага"]);
}

#[test]
fn test_search_only_in_topics() {
    let app = create_app();

    let mut scoped = request("да");
    scoped.topics = vec!["прощание".to_string()];
    scoped.only_in_topics = true;
    let output = app.search(&scoped).unwrap();
    assert!(output.semantic.is_empty());
    assert!(output.keyword.is_empty());

    scoped.topics = vec!["СОГЛАСИЕ".to_string()];
    let output = app.search(&scoped).unwrap();
    assert_eq!(phrases(&output.semantic), vec!["Да/Ага"]);
}

#[test]
fn test_search_with_unknown_topic_scope_is_empty() {
    let app = create_app();

    let mut scoped = request("да");
    scoped.topics = vec!["вклады".to_string()];
    scoped.only_in_topics = true;
    let output = app.search(&scoped).unwrap();
    assert!(output.semantic.is_empty());
    assert!(output.keyword.is_empty());
}

#[test]
fn test_topics_without_scope_do_not_restrict() {
    let app = create_app();

    let mut selected = request("да");
    selected.topics = vec!["прощание".to_string()];
    let output = app.search(&selected).unwrap();
    assert_eq!(phrases(&output.keyword), vec!["Да/Ага"]);

    selected.filter_results = true;
    let output = app.search(&selected).unwrap();
    assert!(output.semantic.is_empty());
    assert!(output.keyword.is_empty());
}

#[test]
fn test_topic_catalog() {
    let app = create_app();
    let topics = app.topics();

    let keys: Vec<&str> = topics.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["карты", "кредиты", "отказ", "погашение", "прощание", "согласие"]
    );
    let agreement = topics.iter().find(|t| t.key == "согласие").unwrap();
    assert_eq!(agreement.display, "Согласие");
}

#[test]
fn test_browse_by_topics() {
    let app = create_app();
    let entries = app.browse(&["согласие".to_string(), "карты".to_string()]);

    assert_eq!(
        entries,
        vec![
            BrowseEntry {
                phrase: "Да/Ага".to_string(),
                topics: vec!["Согласие".to_string()],
                comment: String::new(),
            },
            BrowseEntry {
                phrase: "Кредитные карты".to_string(),
                topics: vec!["Карты".to_string()],
                comment: "Уточнить лимит".to_string(),
            },
        ]
    );
}

#[test]
fn test_query_without_words_keeps_keyword_results() {
    let app = create_app();
    let output = app.search(&request("?!")).unwrap();

    assert!(output.semantic.is_empty());
    assert_eq!(
        phrases(&output.keyword),
        vec!["Да/Ага", "Хочу погасить кредит", "Кредитные карты", "Нет", "Пока"]
    );
}

#[test]
fn test_search_output_json_shape() {
    let app = create_app();
    let output = app.search(&request("нет")).unwrap();
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["semantic"][0]["kind"], "scored");
    assert_eq!(json["semantic"][0]["phrase"], "Нет");
    assert_eq!(json["keyword"][0]["kind"], "unscored");
    assert_eq!(json["keyword"][0]["topics"][0], "Отказ");
}
