use std::sync::Arc;

use dioxus::prelude::ReadableExt;
use drill_core::model::LEVELS;
use services::{PracticeLoopService, RandomSource};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_loop};
use crate::vm::{AnswerField, PracticeIntent};

struct Overflowing;

impl RandomSource for Overflowing {
    fn int_in(&mut self, _min: i64, _max: i64) -> i64 {
        i64::MAX
    }

    fn coin(&mut self) -> bool {
        true
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_level_grid() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("分數練習達人"), "missing title in {html}");
    for level in &LEVELS {
        assert!(html.contains(level.title), "missing {} in {html}", level.title);
    }
    assert_eq!(html.matches("開始練習").count(), 6);
    assert!(html.contains("例題："), "missing example heading in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_renders_batch_and_scratchpad() {
    let mut harness = setup_view_harness(ViewKind::Practice(3));
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains(LEVELS[2].title), "missing level title in {html}");
    for label in ["第 1 題", "第 2 題", "第 3 題"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert!(html.contains("核對答案"), "missing check button in {html}");
    assert!(html.contains("換一批題目"), "missing new batch button in {html}");
    assert!(html.contains("草稿區"), "missing scratchpad in {html}");
    assert!(html.contains("data:image/png;base64,"), "missing bitmap in {html}");
    assert!(!html.contains("practice-score"), "unexpected score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_checks_and_shows_feedback() {
    let mut harness = setup_view_harness(ViewKind::Practice(1));
    harness.rebuild();

    let dispatch = harness.practice().dispatch();
    dispatch.call(PracticeIntent::Edit {
        index: 0,
        field: AnswerField::Numerator,
        raw: "x".to_string(),
    });
    dispatch.call(PracticeIntent::Check);
    harness.drive();
    let html = harness.render();

    assert!(html.contains("✘"), "missing incorrect icon in {html}");
    assert!(html.contains("正確答案:"), "missing correct answer in {html}");
    assert!(html.contains("答對 0 / 3 題"), "missing score in {html}");

    dispatch.call(PracticeIntent::NewBatch);
    harness.drive();
    let html = harness.render();
    assert!(!html.contains("✘"), "stale feedback in {html}");
    let vm = harness.practice().vm();
    let guard = vm.peek();
    let current = guard.as_ref().expect("practice vm");
    assert!(current.cards().iter().all(|card| card.numerator.is_empty()));
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_renders_empty_batch_message() {
    let practice_loop = Arc::new(PracticeLoopService::with_source(|| Overflowing));
    let mut harness = setup_view_harness_with_loop(ViewKind::Practice(6), practice_loop);
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("無法載入題目，請返回並重試。"), "missing message in {html}");
    assert!(html.contains("重試"), "missing retry in {html}");
    let vm = harness.practice().vm();
    let guard = vm.peek();
    assert!(!guard.as_ref().expect("practice vm").can_check());
}

#[tokio::test(flavor = "current_thread")]
async fn practice_view_smoke_rejects_unknown_level() {
    let mut harness = setup_view_harness(ViewKind::Practice(9));
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("找不到這個等級。"), "missing message in {html}");
    assert!(html.contains("返回等級選擇"), "missing back button in {html}");
}
