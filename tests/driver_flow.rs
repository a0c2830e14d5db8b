use std::{cell::RefCell, rc::Rc};

use scrollreel::{
    Anchor, ChoreoConfig, Experience, JumpStatus, MotionMode, MotionSignals, PageSnapshot, Rect,
    ScrollDriver, SectionId, SegmentKind, TransitionStage, Viewport,
};

const PIN_START: f64 = 100.0;
// about slide 1280 + reveal 800 + projects slide 1280 + scroll 1200 + blogs slide 1280
const TOTAL: f64 = 5840.0;

fn id(s: &str) -> SectionId {
    SectionId::new(s)
}

fn wide() -> MotionSignals {
    MotionSignals {
        viewport_width: 1280.0,
        ..Default::default()
    }
}

fn narrow() -> MotionSignals {
    MotionSignals {
        viewport_width: 800.0,
        ..Default::default()
    }
}

fn page() -> PageSnapshot {
    let full = Rect::new(0.0, 0.0, 1280.0, 800.0);
    PageSnapshot::new(Viewport {
        width: 1280.0,
        height: 800.0,
    })
    .with_pin_start(PIN_START)
    .with_panel("hero", 800.0)
    .with_panel("about", 800.0)
    .with_panel("projects", 2000.0)
    .with_panel("blogs", 800.0)
    .with_anchor("hero", Anchor::ComposeLayer, full)
    .with_anchor("hero", Anchor::ComposeStack, Rect::new(400.0, 200.0, 880.0, 600.0))
    .with_anchor("hero", Anchor::Focal, Rect::new(560.0, 320.0, 720.0, 480.0))
    .with_anchor("hero", Anchor::Rest, full)
    .with_section_box("hero", 0.0, 800.0)
    .with_section_box("about", 800.0, 800.0)
    .with_section_box("projects", 1600.0, 2000.0)
    .with_section_box("blogs", 3600.0, 800.0)
    .with_section_box("cta", 6740.0, 700.0)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn mount(page: &mut PageSnapshot, signals: MotionSignals) -> Experience {
    init_tracing();
    Experience::mount(ChoreoConfig::default(), signals, page).unwrap()
}

fn scroll(exp: &mut Experience, page: &mut PageSnapshot, offset: f64) {
    page.scroll_offset = offset;
    exp.on_scroll(offset);
    exp.on_frame(page, 0.016);
}

/// Echo the jump's own write back as a scroll event, like a browser would.
fn run_frame(exp: &mut Experience, page: &mut PageSnapshot, dt: f64) {
    exp.on_frame(page, dt);
    exp.on_scroll(page.scroll_offset);
}

#[test]
fn mount_publishes_pin_length() {
    let mut page = page();
    let exp = mount(&mut page, wide());
    assert_eq!(exp.mode(), MotionMode::Pinned { reduced: false });
    assert_eq!(page.record.pin_length, Some(TOTAL));
    assert_eq!(exp.schedule().unwrap().pin_end(), PIN_START + TOTAL);
    assert_eq!(exp.active_section().get(), id("hero"));
    assert_eq!(page.record.applied, 1);
}

#[test]
fn panel_resize_rebuilds_and_republishes() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());

    page.set_panel_height(&id("projects"), Some(2400.0));
    assert!(exp.on_panel_resize(&id("projects")));
    let report = exp.on_frame(&mut page, 0.016).unwrap();
    assert!(report.rebuilt);
    assert_eq!(page.record.pin_length, Some(TOTAL + 400.0));

    // Same reading again: no rebuild, but the pin length is still published.
    page.record.pin_length = None;
    exp.on_panel_resize(&id("projects"));
    let report = exp.on_frame(&mut page, 0.016).unwrap();
    assert!(!report.rebuilt);
    assert_eq!(page.record.pin_length, Some(TOTAL + 400.0));
}

#[test]
fn viewport_resize_rebuilds_from_new_width() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());

    page.viewport = Viewport {
        width: 1440.0,
        height: 900.0,
    };
    page.track_width = Some(1440.0);
    let signals = MotionSignals {
        viewport_width: 1440.0,
        ..Default::default()
    };
    assert!(exp.on_viewport_resize(&mut page, signals));
    let report = exp.on_frame(&mut page, 0.016).unwrap();
    assert!(report.rebuilt);
    // three slides, a one-viewport reveal and 2000 - 900 of sub-scroll
    assert_eq!(page.record.pin_length, Some(3.0 * 1440.0 + 900.0 + 1100.0));
}

#[test]
fn unavailable_measurement_is_a_no_op_until_retried() {
    let mut page = page();
    page.set_panel_height(&id("blogs"), None);
    let mut exp = mount(&mut page, wide());
    assert!(exp.schedule().is_none());
    assert_eq!(page.record.pin_length, None);
    assert_eq!(page.record.applied, 0);

    scroll(&mut exp, &mut page, 900.0);
    assert!(exp.schedule().is_none());
    assert_eq!(exp.active_section().get(), id("hero"));

    page.set_panel_height(&id("blogs"), Some(800.0));
    exp.on_panel_resize(&id("blogs"));
    let report = exp.on_frame(&mut page, 0.016).unwrap();
    assert!(report.ready && report.rebuilt);
    assert_eq!(page.record.pin_length, Some(TOTAL));
    assert_eq!(exp.active_section().get(), id("about"));
}

#[test]
fn scrubbing_moves_the_track_and_reports_stages() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());

    scroll(&mut exp, &mut page, PIN_START + 200.0);
    assert_eq!(exp.current_stage(), Some(TransitionStage::Hold));
    scroll(&mut exp, &mut page, PIN_START + 800.0);
    assert_eq!(exp.current_stage(), Some(TransitionStage::Collapse));
    scroll(&mut exp, &mut page, PIN_START + 1280.0);
    assert_eq!(exp.current_stage(), Some(TransitionStage::Settle));
    let pose = page.record.pose.clone().unwrap();
    assert_eq!(pose.track_x(), Some(-1280.0));

    // end of the projects slide
    scroll(&mut exp, &mut page, PIN_START + 3360.0);
    assert_eq!(exp.current_stage(), None);
    assert_eq!(page.record.pose.as_ref().unwrap().track_x(), Some(-2560.0));
}

#[test]
fn scrub_is_pure_in_offset() {
    let mut page = page();
    let mut driver = ScrollDriver::new(ChoreoConfig::default(), false);
    assert!(driver.remeasure(&mut page).unwrap());

    driver.scrub(&mut page, 2500.0).unwrap();
    let first = page.record.pose.clone();
    driver.scrub(&mut page, 4000.0).unwrap();
    driver.scrub(&mut page, 2500.0).unwrap();
    assert_eq!(page.record.pose, first);

    assert_eq!(driver.progress_at(0.0), Some(0.0));
    assert_eq!(driver.progress_at(PIN_START + TOTAL / 2.0), Some(0.5));
    assert_eq!(driver.progress_at(1.0e9), Some(1.0));
}

#[test]
fn active_section_notifies_only_on_change() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    exp.active_section()
        .subscribe(move |s: &SectionId| log.borrow_mut().push(s.clone()));

    scroll(&mut exp, &mut page, 3000.0);
    scroll(&mut exp, &mut page, 3100.0);
    scroll(&mut exp, &mut page, 7000.0);
    assert_eq!(*seen.borrow(), vec![id("projects"), id("cta")]);
}

#[test]
fn jump_settles_on_encoded_offset() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());

    let jump = exp.navigate_to_section(&page, &id("projects")).unwrap();
    run_frame(&mut exp, &mut page, 0.4);
    assert!(exp.is_jumping());
    // detection is frozen while the jump runs
    assert_eq!(exp.active_section().get(), id("hero"));

    for _ in 0..10 {
        run_frame(&mut exp, &mut page, 0.1);
    }
    assert!(!exp.is_jumping());
    assert_eq!(exp.jump_status(jump), JumpStatus::Settled);
    assert_eq!(page.scroll_offset, PIN_START + 1280.0 + 800.0 + 1280.0);
    assert_eq!(exp.active_section().get(), id("projects"));
}

#[test]
fn jump_to_post_pin_section_uses_document_offset() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());
    exp.navigate_to_section(&page, &id("cta")).unwrap();
    for _ in 0..10 {
        run_frame(&mut exp, &mut page, 0.1);
    }
    assert_eq!(page.scroll_offset, 6740.0);
    assert_eq!(exp.active_section().get(), id("cta"));
}

#[test]
fn unknown_jump_target_is_ignored() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());
    assert!(exp.navigate_to_section(&page, &id("footer")).is_none());
    assert!(!exp.is_jumping());
}

#[test]
fn own_writes_do_not_cancel_but_user_scroll_does() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());

    let jump = exp.navigate_to_section(&page, &id("blogs")).unwrap();
    run_frame(&mut exp, &mut page, 0.1);
    run_frame(&mut exp, &mut page, 0.1);
    assert_eq!(exp.jump_status(jump), JumpStatus::InFlight);

    let user = page.scroll_offset + 300.0;
    scroll(&mut exp, &mut page, user);
    assert_eq!(exp.jump_status(jump), JumpStatus::Cancelled);
    assert!(!exp.is_jumping());
    assert_eq!(page.scroll_offset, user);
}

#[test]
fn reduced_motion_pinned_last_jump_wins() {
    let mut config = ChoreoConfig::default();
    config.motion.pin_under_reduced_motion = true;
    let signals = MotionSignals {
        reduced_motion: true,
        ..wide()
    };
    let mut page = page();
    let mut exp = Experience::mount(config, signals, &mut page).unwrap();
    assert_eq!(exp.mode(), MotionMode::Pinned { reduced: true });

    let a = exp.navigate_to_section(&page, &id("projects")).unwrap();
    let b = exp.navigate_to_section(&page, &id("blogs")).unwrap();
    run_frame(&mut exp, &mut page, 0.016);

    let projects = PIN_START + 1280.0 + 800.0 + 1280.0;
    assert_eq!(page.scroll_offset, PIN_START + TOTAL);
    assert!(!page.record.scroll_writes.contains(&projects));
    assert_eq!(exp.jump_status(a), JumpStatus::Superseded);
    assert_eq!(exp.jump_status(b), JumpStatus::Settled);
    assert_eq!(exp.active_section().get(), id("blogs"));
}

#[test]
fn reduced_motion_vertical_last_jump_wins() {
    let signals = MotionSignals {
        reduced_motion: true,
        ..wide()
    };
    let mut page = page();
    let mut exp = mount(&mut page, signals);
    assert_eq!(exp.mode(), MotionMode::Vertical);
    assert!(exp.schedule().is_none());

    exp.navigate_to_section(&page, &id("projects")).unwrap();
    exp.navigate_to_section(&page, &id("blogs")).unwrap();
    run_frame(&mut exp, &mut page, 0.016);

    assert_eq!(page.record.scroll_writes, vec![3600.0]);
    assert_eq!(exp.active_section().get(), id("blogs"));
}

#[test]
fn narrowing_the_viewport_releases_the_pin() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());
    exp.navigate_to_section(&page, &id("blogs")).unwrap();

    assert!(exp.on_viewport_resize(&mut page, narrow()));
    assert_eq!(exp.mode(), MotionMode::Vertical);
    assert_eq!(page.record.pin_length, Some(0.0));
    assert!(!exp.is_jumping());

    scroll(&mut exp, &mut page, 1700.0);
    assert_eq!(exp.active_section().get(), id("projects"));
    assert_eq!(exp.current_stage(), None);
}

#[test]
fn unmount_releases_the_pin() {
    let mut page = page();
    let exp = mount(&mut page, wide());
    assert_eq!(page.record.pin_length, Some(TOTAL));
    exp.unmount(&mut page);
    assert_eq!(page.record.pin_length, Some(0.0));
}

#[test]
fn desktop_fixture_builds_a_schedule() {
    let s = include_str!("data/page_desktop.json");
    let mut page = PageSnapshot::from_json_str(s).unwrap();
    let mut driver = ScrollDriver::new(ChoreoConfig::default(), false);
    assert!(driver.remeasure(&mut page).unwrap());

    let schedule = driver.schedule().unwrap();
    assert_eq!(schedule.phases().len(), 5);
    assert_eq!(page.record.pin_length, Some(schedule.total_distance()));
    let resolver = driver.resolver().unwrap();
    assert_eq!(resolver.decode(schedule.pin_end() + 1.0), id("cta"));
}

#[test]
fn late_anchors_switch_the_first_slide_to_choreography() {
    let mut page = page();
    page.panels.get_mut(&id("hero")).unwrap().anchors.clear();
    let mut driver = ScrollDriver::new(ChoreoConfig::default(), false);
    assert!(driver.remeasure(&mut page).unwrap());
    assert_eq!(driver.timeline().unwrap().segments()[0].kind, SegmentKind::Slide);

    let full = Rect::new(0.0, 0.0, 1280.0, 800.0);
    page = page
        .with_anchor("hero", Anchor::ComposeLayer, full)
        .with_anchor("hero", Anchor::ComposeStack, Rect::new(400.0, 200.0, 880.0, 600.0))
        .with_anchor("hero", Anchor::Focal, Rect::new(560.0, 320.0, 720.0, 480.0))
        .with_anchor("hero", Anchor::Rest, full);
    assert!(driver.remeasure(&mut page).unwrap());
    assert_eq!(
        driver.timeline().unwrap().segments()[0].kind,
        SegmentKind::Choreography
    );
    assert!(!driver.remeasure(&mut page).unwrap());
}

#[test]
fn anchors_mounting_after_first_build_rebuild_on_resize() {
    let mut page = page();
    let anchors = std::mem::take(&mut page.panels.get_mut(&id("hero")).unwrap().anchors);
    let mut exp = mount(&mut page, wide());
    scroll(&mut exp, &mut page, PIN_START + 200.0);
    assert_eq!(exp.current_stage(), None);

    page.panels.get_mut(&id("hero")).unwrap().anchors = anchors;
    exp.on_panel_resize(&id("hero"));
    let report = exp.on_frame(&mut page, 0.016).unwrap();
    assert!(report.rebuilt);
    assert_eq!(report.stage, Some(TransitionStage::Hold));
    assert_eq!(exp.current_stage(), Some(TransitionStage::Hold));
}

#[test]
fn unmounted_panel_drops_the_schedule() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());
    scroll(&mut exp, &mut page, 3000.0);
    let applied = page.record.applied;

    page.set_panel_height(&id("projects"), None);
    exp.on_panel_resize(&id("projects"));
    let report = exp.on_frame(&mut page, 0.016).unwrap();
    assert!(!report.ready);
    assert_eq!(report.progress, None);
    assert_eq!(report.section, None);
    assert!(exp.schedule().is_none());
    assert_eq!(page.record.applied, applied);

    scroll(&mut exp, &mut page, 3500.0);
    assert_eq!(page.record.applied, applied);
    assert_eq!(exp.active_section().get(), id("projects"));

    page.set_panel_height(&id("projects"), Some(2000.0));
    exp.on_panel_resize(&id("projects"));
    let report = exp.on_frame(&mut page, 0.016).unwrap();
    assert!(report.ready && report.rebuilt);
    assert_eq!(page.record.applied, applied + 1);
}

#[test]
fn failed_build_is_retried_on_the_next_frame() {
    let mut page = page();
    let mut exp = mount(&mut page, wide());

    // a non-finite pin start cannot be laid out as keyframes
    page.pin_start = f64::NAN;
    exp.on_panel_resize(&id("hero"));
    assert!(exp.on_frame(&mut page, 0.016).is_none());
    assert!(exp.schedule().is_none());

    page.pin_start = PIN_START;
    let report = exp.on_frame(&mut page, 0.016).unwrap();
    assert!(report.ready && report.rebuilt);
    assert_eq!(exp.schedule().unwrap().pin_start(), PIN_START);
}

#[test]
fn settled_vertical_jump_keeps_a_short_target_active() {
    // cta ends above the observation band once it is scrolled to the top
    let mut page = page().with_section_box("cta", 6740.0, 200.0);
    let mut exp = mount(&mut page, narrow());
    assert_eq!(exp.mode(), MotionMode::Vertical);

    exp.navigate_to_section(&page, &id("cta")).unwrap();
    for _ in 0..10 {
        run_frame(&mut exp, &mut page, 0.1);
    }
    assert!(!exp.is_jumping());
    assert_eq!(page.scroll_offset, 6740.0);
    assert_eq!(exp.active_section().get(), id("cta"));
}
