mod support;

use std::{cell::RefCell, collections::BTreeSet, num::NonZeroUsize, rc::Rc};

use postpager::{
    application::{
        controller::UserAction, filter::YearFilter, location::MemoryLocation,
        pagination::Paginator, session::Session,
    },
    domain::{
        posts::PostItem,
        year::{Year, YearChoice},
    },
};

use support::{BLOG_URL, attach, blog_page, fragment, repeat, visible_positions};

#[test]
fn undated_list_paginates_without_filter() {
    let html = blog_page(&repeat(None, 45));
    let mut session = attach(&html, BLOG_URL, 20);

    assert!(session.controller().filter().is_none());
    assert_eq!(session.controller().total_pages(), 3);
    assert_eq!(session.view().pagination.indicator, "Page 1 of 3");
    assert_eq!(visible_positions(&session), (0..20).collect::<Vec<_>>());

    assert!(session.apply(&UserAction::Next));
    assert_eq!(session.view().pagination.indicator, "Page 2 of 3");
    assert_eq!(fragment(&session).as_deref(), Some("page=2"));
    assert_eq!(visible_positions(&session), (20..40).collect::<Vec<_>>());

    assert!(session.apply(&UserAction::Next));
    assert_eq!(visible_positions(&session), (40..45).collect::<Vec<_>>());
    assert!(session.view().pagination.next_disabled);
}

#[test]
fn selecting_a_year_recomputes_pages() {
    let mut years = repeat(Some("2021"), 5);
    years.extend(repeat(Some("2022"), 30));
    let html = blog_page(&years);
    let mut session = attach(&html, &format!("{BLOG_URL}#page=2"), 20);
    assert_eq!(session.controller().current_page(), 2);

    assert!(session.apply(&UserAction::SelectYear("2022".to_string())));

    let view = session.view();
    let filter = view.filter.as_ref().expect("filter view");
    assert_eq!(filter.badge, "30 of 35 posts");
    assert!(!filter.empty_state_visible);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.current_page, 1);
    assert_eq!(fragment(&session).as_deref(), Some("page=1"));
    assert_eq!(visible_positions(&session), (5..25).collect::<Vec<_>>());

    session.apply(&UserAction::Next);
    assert_eq!(visible_positions(&session), (25..35).collect::<Vec<_>>());
}

#[test]
fn empty_year_hides_pagination_and_shows_empty_state() {
    // A catalog year that no item carries can only come from a filter built
    // with an explicit catalog.
    let mut items: Vec<PostItem> = (0..3)
        .map(|position| PostItem::new(position, Some(Year::parse("2021").expect("year"))))
        .collect();
    let catalog = ["2019", "2021"]
        .into_iter()
        .map(|label| Year::parse(label).expect("year"))
        .collect();
    let mut filter = YearFilter::new(catalog, items.len()).expect("filter");
    let mut pager = Paginator::new(NonZeroUsize::new(20).expect("page size"));

    let event = filter
        .select(YearChoice::Year(Year::parse("2019").expect("year")), &mut items)
        .expect("applied");
    pager.rebuild(&items);
    pager.show_page(1, &mut items);

    assert_eq!(event.visible, 0);
    assert!(filter.shows_empty_state());
    assert_eq!(filter.badge(), "0 of 3 posts");
    assert_eq!(pager.total_pages(), 1);
    assert!(pager.controls().hidden);
    assert!(items.iter().all(|item| !item.is_visible()));
}

#[test]
fn out_of_range_marker_clamps_without_writing_location() {
    let html = blog_page(&repeat(Some("2020"), 30));
    let session = attach(&html, &format!("{BLOG_URL}#page=99"), 20);

    assert_eq!(session.controller().current_page(), 2);
    assert_eq!(session.controller().location().replacements(), 0);
    assert_eq!(fragment(&session).as_deref(), Some("page=99"));
    assert_eq!(visible_positions(&session), (20..30).collect::<Vec<_>>());
}

#[test]
fn malformed_markers_fall_back_to_first_page() {
    let html = blog_page(&repeat(None, 45));
    for url in [
        format!("{BLOG_URL}#page=abc"),
        format!("{BLOG_URL}#page=0"),
        format!("{BLOG_URL}#section-2"),
        BLOG_URL.to_string(),
    ] {
        let session = attach(&html, &url, 20);
        assert_eq!(session.controller().current_page(), 1, "url {url}");
    }

    let session = attach(&html, &format!("{BLOG_URL}#top&page=3"), 20);
    assert_eq!(session.controller().current_page(), 3);
}

#[test]
fn written_marker_survives_reload() {
    let mut years = repeat(Some("2019"), 10);
    years.extend(repeat(None, 35));
    let html = blog_page(&years);

    for target in 1..=3 {
        let mut session = attach(&html, BLOG_URL, 20);
        for _ in 1..target {
            assert!(session.apply(&UserAction::Next));
        }
        let url = session.controller().location().url().to_string();

        let reloaded = attach(&html, &url, 20);
        assert_eq!(reloaded.controller().current_page(), target, "url {url}");
        assert_eq!(visible_positions(&reloaded), visible_positions(&session));
    }
}

#[test]
fn filter_visibility_matches_extracted_years() {
    let years = [
        Some("2020"),
        None,
        Some("2021"),
        Some("2020"),
        Some("2019"),
        None,
        Some("2021"),
    ];
    let html = blog_page(&years);
    let mut session = attach(&html, BLOG_URL, 50);

    for value in ["2019", "2020", "2021", "all"] {
        session.apply(&UserAction::SelectYear(value.to_string()));
        let shown: Vec<usize> = session
            .controller()
            .items()
            .iter()
            .filter(|item| item.is_filter_visible())
            .map(PostItem::position)
            .collect();
        let expected: Vec<usize> = years
            .iter()
            .enumerate()
            .filter(|(_, year)| value == "all" || **year == Some(value))
            .map(|(position, _)| position)
            .collect();
        assert_eq!(shown, expected, "selection {value}");
    }
}

#[test]
fn pages_partition_the_eligible_items() {
    let mut years = repeat(Some("2022"), 23);
    years.extend(repeat(Some("2018"), 9));
    years.extend(repeat(Some("2022"), 14));
    let html = blog_page(&years);
    let mut session = attach(&html, BLOG_URL, 7);
    session.apply(&UserAction::SelectYear("2022".to_string()));

    let total_pages = session.controller().total_pages();
    assert_eq!(total_pages, 37usize.div_ceil(7));

    let mut seen = Vec::new();
    for page in 1..=total_pages {
        assert_eq!(session.controller().current_page(), page);
        seen.extend(visible_positions(&session));
        session.apply(&UserAction::Next);
    }

    let eligible: Vec<usize> = years
        .iter()
        .enumerate()
        .filter(|(_, year)| **year == Some("2022"))
        .map(|(position, _)| position)
        .collect();
    assert_eq!(seen, eligible);
    assert_eq!(seen.iter().collect::<BTreeSet<_>>().len(), seen.len());
}

#[test]
fn page_stays_in_range_through_any_action_sequence() {
    let mut years = repeat(Some("2023"), 12);
    years.extend(repeat(Some("2024"), 3));
    years.extend(repeat(None, 6));
    let html = blog_page(&years);
    let mut session = attach(&html, &format!("{BLOG_URL}#page=4"), 4);

    let actions = [
        "next", "next", "next", "year:2024", "next", "prev", "clear", "next", "next",
        "year:2023", "next", "next", "next", "next", "year:1999", "prev", "clear", "prev",
    ];
    for action in actions {
        session.apply(&action.parse().expect("action"));
        let controller = session.controller();
        let eligible = controller
            .items()
            .iter()
            .filter(|item| item.is_filter_visible())
            .count();
        assert_eq!(
            controller.total_pages(),
            eligible.div_ceil(4).max(1),
            "after {action}"
        );
        assert!(
            (1..=controller.total_pages()).contains(&controller.current_page()),
            "after {action}"
        );
    }
}

#[test]
fn clearing_all_is_silent() {
    let html = blog_page(&[Some("2021"), Some("2022"), None]);
    let mut session = attach(&html, BLOG_URL, 20);

    let notified = Rc::new(RefCell::new(0));
    {
        let notified = Rc::clone(&notified);
        session
            .controller_mut()
            .subscribe(move |_| *notified.borrow_mut() += 1);
    }

    let before = session.render().expect("render");
    let revision = session.controller().revision();

    assert!(!session.apply(&UserAction::Clear));
    assert_eq!(session.render().expect("render"), before);
    assert_eq!(session.controller().revision(), revision);
    assert_eq!(session.controller().location().replacements(), 0);
    assert_eq!(*notified.borrow(), 0);

    assert!(session.apply(&UserAction::SelectYear("2022".to_string())));
    assert!(session.apply(&UserAction::Clear));
    assert_eq!(*notified.borrow(), 2);
}

#[test]
fn unknown_year_selection_changes_nothing() {
    let html = blog_page(&[Some("2021"), Some("2022")]);
    let mut session = attach(&html, BLOG_URL, 20);
    let before = session.view();

    assert!(!session.apply(&UserAction::SelectYear("1987".to_string())));
    assert!(!session.apply(&UserAction::SelectYear("recent".to_string())));
    assert_eq!(session.view(), before);
}

#[test]
fn pages_without_a_post_list_stay_inert() {
    let location = || MemoryLocation::parse(BLOG_URL).expect("url");
    let page_size = NonZeroUsize::new(20).expect("page size");

    let no_list = "<html><body><ul class=\"menu\"><li>Home</li></ul></body></html>";
    assert!(
        Session::attach(no_list, location(), page_size)
            .expect("parses")
            .is_none()
    );

    let no_items = "<html><body><ul class=\"blog-posts\"></ul></body></html>";
    assert!(
        Session::attach(no_items, location(), page_size)
            .expect("parses")
            .is_none()
    );
}

#[test]
fn years_come_from_visible_text_when_no_time_element() {
    let html = "<ul class=\"posts\">\
        <li><a href=\"/a\">Retrospective</a> <span class=\"date\">2017-05-02</span></li>\
        <li><a href=\"/b\">Notes from 1998</a></li>\
        <li><a href=\"/c\">Nothing here</a></li>\
        </ul>";
    let session = attach(html, BLOG_URL, 20);

    let years: Vec<Option<String>> = session
        .controller()
        .items()
        .iter()
        .map(|item| item.year().map(Year::label))
        .collect();
    assert_eq!(
        years,
        [Some("2017".to_string()), Some("1998".to_string()), None]
    );
    assert_eq!(session.list().selector, ".posts");
}

#[test]
fn ambiguous_markup_elsewhere_does_not_block_attach() {
    let html = "<select><ul class=\"posts\"><li>2021</li></ul><style>y</style></select>";
    let location = MemoryLocation::parse(BLOG_URL).expect("url");
    let page_size = NonZeroUsize::new(20).expect("page size");

    let session = Session::attach(html, location, page_size)
        .expect("attach never fails on page markup")
        .expect("post list discovered");

    let years: Vec<Option<String>> = session
        .controller()
        .items()
        .iter()
        .map(|item| item.year().map(Year::label))
        .collect();
    assert_eq!(years, [Some("2021".to_string())]);
    assert!(session.render().is_ok());
}

#[test]
fn unclosed_items_do_not_borrow_a_neighbours_year() {
    let html = "<ul class=\"posts\"><li><a>Untitled</a><li><time datetime=\"2021-01-01\">x</time><li>Old post 1999</ul>";
    let mut session = attach(html, BLOG_URL, 20);

    assert!(session.apply(&UserAction::SelectYear("2021".to_string())));
    let shown: Vec<usize> = session
        .controller()
        .items()
        .iter()
        .filter(|item| item.is_filter_visible())
        .map(PostItem::position)
        .collect();
    assert_eq!(shown, [1]);

    let rendered = session.render().expect("render");
    assert!(rendered.contains("<li class=\"yf-hidden pg-hidden\"><a>Untitled</a>"));
}
