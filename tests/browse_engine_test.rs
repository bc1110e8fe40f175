// 浏览引擎集成测试
//
// 查询串编解码的往返性质、视图推导的子集性质，以及浏览会话的完整流程

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use media_browse_backend::models::{
    ActiveFilter, ContentRecord, Facet, Movie, ScoreRange, SortKey, ViewDefaults, ViewMode,
    ViewState, VisualTreat, YearRange,
};
use media_browse_backend::services::view_engine::matches_filters;
use media_browse_backend::services::{apply_view, BrowseSession, Catalog, QueryCodec};

const CURRENT_YEAR: i32 = 2025;

fn movie(id: &str, title: &str, genres: &[&str], year: i32, score: f32) -> Movie {
    Movie {
        genres: genres.iter().map(|g| g.to_string()).collect(),
        year: Some(year),
        siddu_score: Some(score),
        popularity: Some(score as f64 * 10.0),
        ..Movie::new(id, title)
    }
}

fn movie_catalog() -> Arc<Catalog<Movie>> {
    let records = vec![
        Movie {
            director: Some("Christopher Nolan".to_string()),
            ..movie("inception", "Inception", &["Action", "Sci-Fi"], 2010, 9.3)
        },
        movie("dark-knight", "The Dark Knight", &["Action", "Drama"], 2008, 9.5),
        movie("parasite", "Parasite", &["Drama", "Thriller"], 2019, 9.2),
        movie("amelie", "Amélie", &["Comedy", "Romance"], 2001, 8.4),
        movie("old-one", "An Old One", &["Drama"], 1950, 6.0),
    ];
    Arc::new(Catalog::new(records).unwrap())
}

fn session(catalog: Arc<Catalog<Movie>>) -> BrowseSession<Movie> {
    BrowseSession::new(
        catalog,
        QueryCodec::new(ViewDefaults::movies(CURRENT_YEAR)),
        "/movies",
        Duration::from_millis(300),
    )
}

fn ids<R: ContentRecord>(records: &[&R]) -> Vec<String> {
    records.iter().map(|r| r.id().to_string()).collect()
}

// ---------------------------------------------------------------------------
// 生成器
// ---------------------------------------------------------------------------

fn arb_sort() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

fn arb_view_mode() -> impl Strategy<Value = ViewMode> {
    prop_oneof![Just(ViewMode::Grid), Just(ViewMode::List)]
}

fn arb_facet_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,%&+-]{1,12}"
}

fn arb_selections() -> impl Strategy<Value = Vec<(Facet, Vec<String>)>> {
    prop::collection::vec(
        (
            prop::sample::select(Facet::ALL.to_vec()),
            prop::collection::vec(arb_facet_value(), 0..4),
        ),
        0..4,
    )
}

fn arb_year_range() -> impl Strategy<Value = Option<YearRange>> {
    prop::option::of(
        (ViewDefaults::YEAR_FLOOR..=CURRENT_YEAR, ViewDefaults::YEAR_FLOOR..=CURRENT_YEAR)
            .prop_filter_map("inverted", |(a, b)| YearRange::new(a.min(b), a.max(b))),
    )
}

fn arb_score_range() -> impl Strategy<Value = Option<ScoreRange>> {
    prop::option::of(
        (0u8..=100, 0u8..=100).prop_filter_map("inverted", |(a, b)| {
            ScoreRange::new(a.min(b) as f32 / 10.0, a.max(b) as f32 / 10.0)
        }),
    )
}

/// 经过规范化的任意视图
fn arb_view(defaults: ViewDefaults) -> impl Strategy<Value = ViewState> {
    (
        arb_sort(),
        arb_view_mode(),
        ".{0,16}",
        arb_selections(),
        arb_year_range(),
        arb_score_range(),
    )
        .prop_map(move |(sort, view_mode, search, selections, year, score)| {
            let mut view = defaults.initial_view();
            view.sort = sort;
            view.view_mode = view_mode;
            view.search = search;
            for (facet, values) in selections {
                view.filters.set_selection(facet, values);
            }
            view.filters.year_range = year;
            view.filters.score_range = score;
            defaults.normalize(view)
        })
}

fn arb_movie() -> impl Strategy<Value = Movie> {
    (
        "[a-z]{1,8}",
        prop::collection::vec(
            prop::sample::select(vec!["Action", "Drama", "Comedy", "Sci-Fi"]),
            0..3,
        ),
        prop::option::of(1900i32..=CURRENT_YEAR),
        prop::option::of(0u8..=100),
    )
        .prop_map(|(title, genres, year, score)| Movie {
            genres: genres.into_iter().map(String::from).collect(),
            year,
            siddu_score: score.map(|s| s as f32 / 10.0),
            ..Movie::new("placeholder", title)
        })
}

fn arb_movies() -> impl Strategy<Value = Vec<Movie>> {
    prop::collection::vec(arb_movie(), 0..20).prop_map(|movies| {
        movies
            .into_iter()
            .enumerate()
            .map(|(i, m)| Movie {
                id: format!("m-{}", i),
                ..m
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// 性质测试
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_movie_view_roundtrips_through_query(view in arb_view(ViewDefaults::movies(CURRENT_YEAR))) {
        let codec = QueryCodec::new(ViewDefaults::movies(CURRENT_YEAR));
        let query = codec.serialize(&view);
        prop_assert_eq!(codec.deserialize(&query), view);
    }

    #[test]
    fn prop_visual_treat_view_roundtrips_through_query(view in arb_view(ViewDefaults::visual_treats(CURRENT_YEAR))) {
        let codec = QueryCodec::new(ViewDefaults::visual_treats(CURRENT_YEAR));
        let query = codec.serialize(&view);
        prop_assert_eq!(codec.deserialize(&query), view);
    }

    #[test]
    fn prop_canonicalize_is_idempotent(query in ".{0,64}") {
        let codec = QueryCodec::new(ViewDefaults::movies(CURRENT_YEAR));
        let once = codec.canonicalize(&query);
        prop_assert_eq!(codec.canonicalize(&once), once.clone());
    }

    #[test]
    fn prop_result_is_filtered_subset(
        movies in arb_movies(),
        view in arb_view(ViewDefaults::movies(CURRENT_YEAR)),
    ) {
        let result = apply_view(&movies, &view);
        prop_assert!(result.len() <= movies.len());
        for record in &result {
            prop_assert!(matches_filters(*record, &view.filters));
        }
    }

    #[test]
    fn prop_apply_view_is_idempotent(
        movies in arb_movies(),
        view in arb_view(ViewDefaults::movies(CURRENT_YEAR)),
    ) {
        let once: Vec<Movie> = apply_view(&movies, &view).into_iter().cloned().collect();
        let twice: Vec<Movie> = apply_view(&once, &view).into_iter().cloned().collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_no_filters_keeps_every_record(movies in arb_movies(), sort in arb_sort()) {
        let mut view = ViewDefaults::movies(CURRENT_YEAR).initial_view();
        view.sort = sort;
        prop_assert_eq!(apply_view(&movies, &view).len(), movies.len());
    }
}

#[test]
fn test_default_views_serialize_to_empty_query() {
    for defaults in [
        ViewDefaults::movies(CURRENT_YEAR),
        ViewDefaults::visual_treats(CURRENT_YEAR),
    ] {
        let codec = QueryCodec::new(defaults.clone());
        assert_eq!(codec.serialize(&defaults.initial_view()), "");
        assert_eq!(codec.deserialize(""), defaults.initial_view());
    }
}

// ---------------------------------------------------------------------------
// 浏览会话流程
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_deep_link_hydrates_view() {
    let mut session = session(movie_catalog());
    assert!(session.hydrate("?genres=Drama&sort=score&view=list"));

    assert_eq!(session.view().sort, SortKey::Score);
    assert_eq!(session.view().view_mode, ViewMode::List);
    assert_eq!(
        ids(&session.results()),
        vec!["dark-knight", "parasite", "old-one"]
    );

    // 第二次 hydrate 不生效
    assert!(!session.hydrate("?genres=Comedy"));
    assert_eq!(session.view().filters.selected(Facet::Genre), ["Drama".to_string()]);
}

#[tokio::test]
async fn test_mutations_before_hydration_do_not_touch_url() {
    let mut session = session(movie_catalog());
    assert_eq!(session.set_sort(SortKey::Oldest), None);

    session.hydrate("");
    assert_eq!(
        session.set_sort(SortKey::Alphabetical).as_deref(),
        Some("/movies?sort=alphabetical")
    );
}

#[tokio::test]
async fn test_filter_chips_can_be_removed_one_by_one() {
    let mut session = session(movie_catalog());
    session.hydrate("");

    session.toggle_facet(Facet::Genre, "Drama");
    session.set_year_range(YearRange::new(2000, CURRENT_YEAR));
    assert!(session.has_active_filters());
    assert_eq!(ids(&session.results()), vec!["parasite", "dark-knight"]);

    let chips = session.active_filters();
    assert_eq!(chips.len(), 2);

    let url = session.remove_filter(&ActiveFilter::Facet {
        facet: Facet::Genre,
        value: "Drama".to_string(),
    });
    assert_eq!(url.as_deref(), Some("/movies?yearStart=2000"));

    let url = session.clear_filters();
    assert_eq!(url.as_deref(), Some("/movies"));
    assert!(!session.has_active_filters());
    assert_eq!(session.results().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_typing_settles_after_quiet_period() {
    let mut session = session(movie_catalog());
    session.hydrate("");

    session.input_search("I");
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.input_search("In");
    tokio::time::sleep(Duration::from_millis(100)).await;
    let url = session.input_search("Inc");

    // URL 立即反映输入，筛选仍使用旧的搜索词
    assert_eq!(url.as_deref(), Some("/movies?search=Inc"));
    assert_eq!(session.view().search, "");
    assert_eq!(session.results().len(), 5);

    assert!(session.next_settled_search().await);
    assert_eq!(session.view().search, "Inc");
    assert_eq!(ids(&session.results()), vec!["inception"]);

    // 只有一次稳定的搜索词
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!session.poll_settled_search());
}

#[tokio::test(start_paused = true)]
async fn test_teardown_discards_pending_search() {
    let mut session = session(movie_catalog());
    session.hydrate("");

    session.input_search("Parasite");
    session.teardown();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(!session.poll_settled_search());
    assert_eq!(session.view().search, "");
}

#[tokio::test]
async fn test_neighbors_wrap_within_current_view() {
    let mut session = session(movie_catalog());
    session.hydrate("?genres=Drama&sort=alphabetical");
    assert_eq!(
        ids(&session.results()),
        vec!["old-one", "parasite", "dark-knight"]
    );

    let around = session.neighbors("old-one").unwrap();
    assert_eq!(around.previous, "dark-knight");
    assert_eq!(around.next, "parasite");

    // 不在当前视图中的记录没有相邻项
    assert!(session.neighbors("amelie").is_none());
}

#[test]
fn test_visual_treats_filter_by_decade() {
    let treat = |id: &str, year: i32| VisualTreat {
        id: id.to_string(),
        title: format!("Shot {}", id),
        description: String::new(),
        film: "Film".to_string(),
        director: "Director".to_string(),
        cinematographer: "DP".to_string(),
        category: "Lighting".to_string(),
        tags: Vec::new(),
        year,
        likes: year as u64,
        views: 0,
        image_url: None,
        color_palette: Vec::new(),
    };
    let treats = vec![treat("a", 1968), treat("b", 2010), treat("c", 2017)];

    let codec = QueryCodec::new(ViewDefaults::visual_treats(CURRENT_YEAR));
    let view = codec.deserialize("decades=2010s");
    assert_eq!(ids(&apply_view(&treats, &view)), vec!["c", "b"]);

    // 视觉盛宴不支持评分区间
    let view = codec.deserialize("scoreStart=5");
    assert!(view.filters.score_range.is_none());
    assert_eq!(apply_view(&treats, &view).len(), 3);
}
