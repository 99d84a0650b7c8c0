use crate::app::{App, SearchRequest};
use crate::phrases::MorphLemmatizer;
use crate::search::SearchHit;
use crate::service::{PhraseService, ServiceOptions};
use crate::tests::support::{HashingEncoder, MapFetcher};

const CREDITS: &str = "phrase,topics,comment
Хочу погасить кредит,Кредиты,
Кредитные карты,Карты,
Нет,Отказ,
";

fn create_app() -> App {
    let service = PhraseService::new(
        Box::new(HashingEncoder::new(64)),
        Box::new(MorphLemmatizer::russian()),
        ServiceOptions::default(),
    );
    let fetcher = MapFetcher::new().with("credits.csv", CREDITS);

    App::load_with(service, &fetcher, &["credits.csv".to_string()]).unwrap()
}

fn keyword(app: &App, query: &str) -> Vec<String> {
    let request = SearchRequest {
        query: query.to_string(),
        top_k: 5,
        threshold: 0.5,
        topics: vec![],
        only_in_topics: false,
        filter_results: false,
    };
    app.search(&request)
        .unwrap()
        .keyword
        .iter()
        .map(|hit| hit.phrase().to_string())
        .collect()
}

#[test]
fn test_inflected_noun_finds_base_form() {
    let app = create_app();
    assert_eq!(keyword(&app, "кредита"), vec!["Хочу погасить кредит"]);
    assert_eq!(keyword(&app, "КРЕДИТОМ"), vec!["Хочу погасить кредит"]);
}

#[test]
fn test_verb_forms_share_a_lemma() {
    let app = create_app();
    assert_eq!(keyword(&app, "хочешь"), vec!["Хочу погасить кредит"]);
    assert_eq!(keyword(&app, "хочешь погасить кредита"), vec!["Хочу погасить кредит"]);
}

#[test]
fn test_keyword_hits_are_unscored() {
    let app = create_app();
    let request = SearchRequest {
        query: "карту".to_string(),
        top_k: 5,
        threshold: 0.5,
        topics: vec![],
        only_in_topics: false,
        filter_results: false,
    };
    let output = app.search(&request).unwrap();
    assert_eq!(output.keyword.len(), 1);
    assert!(matches!(
        &output.keyword[0],
        SearchHit::Unscored { phrase, .. } if phrase == "Кредитные карты"
    ));
}
