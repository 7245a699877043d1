//! EntityTableController tests
//!
//! Drives the controller against the in-memory store in `common`.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::{FakeApi, inheriting_record};
use terse_console::client::ClientError;
use terse_console::controller::{
    Control, ControlPhase, ControllerOptions, EntityTableController, HtmlSurface, MemorySurface,
    NotificationLevel, RefreshOrdering, RefreshOutcome, TableRow,
};
use terse_console::errors::TerseError;
use terse_console::models::{
    ExportSelection, MediaPreview, PreviewMergePolicy, SummarySet, TerseRecord, TerseSummary,
    WriteOperation,
};

// =============================================================================
// Test Setup
// =============================================================================

struct Harness {
    api: Arc<FakeApi>,
    surface: Arc<MemorySurface>,
    controller: Arc<EntityTableController>,
}

fn harness_with(api: FakeApi, options: ControllerOptions) -> Harness {
    let api = Arc::new(api);
    let surface = Arc::new(MemorySurface::new());
    let controller = Arc::new(EntityTableController::new(
        api.clone(),
        surface.clone(),
        options,
    ));
    Harness {
        api,
        surface,
        controller,
    }
}

fn harness(keys: &[&str]) -> Harness {
    harness_with(FakeApi::seeded(keys), ControllerOptions::default())
}

fn keys(rows: &[TableRow]) -> Vec<String> {
    rows.iter().map(|r| r.key().to_string()).collect()
}

fn set(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn summaries(keys: &[&str]) -> SummarySet {
    keys.iter()
        .map(|k| {
            (
                k.to_string(),
                TerseSummary {
                    original_url: format!("https://{}.example", k),
                    shortened_url: k.to_string(),
                    ..Default::default()
                },
            )
        })
        .collect()
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn test_refresh_builds_rows_from_summaries() {
    let h = harness(&["abc", "xyz", "foo"]);
    h.api.set_visits("abc", 7);

    let outcome = h.controller.refresh().await.unwrap();

    assert_eq!(outcome, RefreshOutcome::Applied { rows: 3 });
    assert_eq!(keys(&h.controller.rows()), vec!["abc", "foo", "xyz"]);
    assert_eq!(h.controller.rows()[0].summary.visit_count, 7);
    assert_eq!(h.surface.rows(), h.controller.rows());
}

#[tokio::test]
async fn test_refresh_clears_selection() {
    let h = harness(&["abc", "xyz", "foo"]);
    h.controller.refresh().await.unwrap();

    h.controller.toggle_select_all(true);
    assert_eq!(h.controller.selected_keys().len(), 3);

    h.controller.refresh().await.unwrap();
    assert!(h.controller.selected_keys().is_empty());
    assert!(h.surface.rows().iter().all(|r| !r.selected));
}

#[tokio::test]
async fn test_refresh_respects_filter() {
    let h = harness(&["abc", "xyz", "foo"]);
    h.controller.set_filter(Some(set(&["xyz"])));

    h.controller.refresh().await.unwrap();
    assert_eq!(keys(&h.controller.rows()), vec!["xyz"]);

    h.controller.set_filter(None);
    h.controller.refresh().await.unwrap();
    assert_eq!(h.controller.row_count(), 3);
}

#[tokio::test]
async fn test_refresh_failure_keeps_previous_table() {
    let h = harness(&["abc"]);
    h.controller.refresh().await.unwrap();
    let before = h.controller.rows();

    h.api.fail("summarize", ClientError::Transport("connection refused".into()));
    let err = h.controller.refresh().await.unwrap_err();

    assert!(matches!(err, TerseError::Transport(_)));
    assert_eq!(h.controller.rows(), before);
    assert!(h.surface.last_notification().unwrap().is_error());
}

#[test]
fn test_out_of_order_refresh_last_issued_wins() {
    let h = harness(&[]);
    let first = h.controller.begin_refresh();
    let second = h.controller.begin_refresh();
    assert!(first < second);

    let applied = h
        .controller
        .complete_refresh(second, Ok(summaries(&["new"])))
        .unwrap();
    assert_eq!(applied, RefreshOutcome::Applied { rows: 1 });

    let stale = h
        .controller
        .complete_refresh(first, Ok(summaries(&["old1", "old2"])))
        .unwrap();
    assert_eq!(stale, RefreshOutcome::Stale);
    assert_eq!(keys(&h.controller.rows()), vec!["new"]);
    assert_eq!(h.surface.snapshot().row_renders, 1);
}

#[test]
fn test_out_of_order_refresh_last_resolved_wins() {
    let h = harness_with(
        FakeApi::new(),
        ControllerOptions {
            refresh_ordering: RefreshOrdering::LastResolvedWins,
            ..Default::default()
        },
    );
    let first = h.controller.begin_refresh();
    let second = h.controller.begin_refresh();

    h.controller
        .complete_refresh(second, Ok(summaries(&["new"])))
        .unwrap();
    let outcome = h
        .controller
        .complete_refresh(first, Ok(summaries(&["old1", "old2"])))
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Applied { rows: 2 });
    assert_eq!(keys(&h.controller.rows()), vec!["old1", "old2"]);
}

#[test]
fn test_in_order_refreshes_both_apply() {
    let h = harness(&[]);
    let first = h.controller.begin_refresh();
    let second = h.controller.begin_refresh();

    assert!(matches!(
        h.controller.complete_refresh(first, Ok(summaries(&["a"]))),
        Ok(RefreshOutcome::Applied { rows: 1 })
    ));
    assert!(matches!(
        h.controller.complete_refresh(second, Ok(summaries(&["a", "b"]))),
        Ok(RefreshOutcome::Applied { rows: 2 })
    ));
    assert_eq!(h.surface.snapshot().row_renders, 2);
}

// =============================================================================
// Selection
// =============================================================================

#[tokio::test]
async fn test_toggle_row_and_select_all() {
    let h = harness(&["abc", "xyz"]);
    h.controller.refresh().await.unwrap();

    assert_eq!(h.controller.toggle_row("abc"), Some(true));
    assert_eq!(h.controller.selected_keys(), set(&["abc"]));
    assert_eq!(h.controller.toggle_row("abc"), Some(false));
    assert_eq!(h.controller.toggle_row("missing"), None);

    h.controller.toggle_select_all(true);
    assert_eq!(h.controller.selected_keys(), set(&["abc", "xyz"]));
    h.controller.toggle_select_all(false);
    assert!(h.controller.selected_keys().is_empty());

    // 空表上全选不报错
    let empty = harness(&[]);
    empty.controller.toggle_select_all(true);
    assert!(empty.controller.selected_keys().is_empty());
}

#[tokio::test]
async fn test_set_selected_reports_unknown_keys() {
    let h = harness(&["abc"]);
    h.controller.refresh().await.unwrap();

    assert!(h.controller.set_selected("abc", true));
    assert!(!h.controller.set_selected("zzz", true));
    assert_eq!(h.controller.selected_keys(), set(&["abc"]));
}

// =============================================================================
// Write
// =============================================================================

#[tokio::test]
async fn test_write_success_refreshes_table() {
    let h = harness(&["abc"]);
    h.controller.refresh().await.unwrap();

    let key = h
        .controller
        .write(
            WriteOperation::Insert,
            TerseRecord::new("https://new.example", "new"),
        )
        .await
        .unwrap();

    assert_eq!(key, "new");
    assert_eq!(keys(&h.controller.rows()), vec!["abc", "new"]);
    let note = h.surface.last_notification().unwrap();
    assert_eq!(note.level, NotificationLevel::Success);
    assert!(note.message.contains("new"));
    assert_eq!(h.controller.phase(Control::WriteForm), ControlPhase::Idle);
}

#[tokio::test]
async fn test_write_uses_server_assigned_key() {
    let h = harness(&[]);
    let key = h
        .controller
        .write(
            WriteOperation::Upsert,
            TerseRecord::new("https://long.example/path", ""),
        )
        .await
        .unwrap();

    assert_eq!(key, "gen1");
    assert_eq!(keys(&h.controller.rows()), vec!["gen1"]);
}

#[tokio::test]
async fn test_write_failure_leaves_table_untouched() {
    let h = harness(&["abc", "xyz"]);
    h.controller.refresh().await.unwrap();
    h.controller.toggle_row("xyz");
    let before = h.controller.rows();
    let renders = h.surface.snapshot().row_renders;
    let summarize_calls = h.api.call_count("summarize");

    let err = h
        .controller
        .write(
            WriteOperation::Insert,
            TerseRecord::new("https://abc.example", "abc"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TerseError::Rejected(_)));
    assert_eq!(h.controller.rows(), before);
    assert_eq!(h.surface.snapshot().row_renders, renders);
    assert_eq!(h.api.call_count("summarize"), summarize_calls);

    let note = h.surface.last_notification().unwrap();
    assert!(note.is_error());
    assert!(note.message.contains("already exists"));
    assert!(h.controller.is_enabled(Control::WriteForm));
}

#[tokio::test]
async fn test_invalid_record_makes_no_remote_call() {
    let h = harness(&[]);

    let err = h
        .controller
        .write(
            WriteOperation::Insert,
            TerseRecord::new("javascript:alert(1)", "x"),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TerseError::Validation(_)));
    assert!(h.api.calls().is_empty());
    assert!(h.surface.last_notification().unwrap().is_error());
}

#[tokio::test]
async fn test_write_control_disabled_until_completion() {
    let h = harness(&[]);
    let release = h.api.hold_next_write();

    let task = tokio::spawn({
        let controller = h.controller.clone();
        async move {
            controller
                .write(
                    WriteOperation::Insert,
                    TerseRecord::new("https://slow.example", "slow"),
                )
                .await
        }
    });

    for _ in 0..100 {
        if !h.controller.is_enabled(Control::WriteForm) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(h.controller.phase(Control::WriteForm), ControlPhase::Submitting);

    // 提交期间再次点击被拒绝，且不触发远程调用
    let busy = h
        .controller
        .write(
            WriteOperation::Insert,
            TerseRecord::new("https://other.example", "other"),
        )
        .await
        .unwrap_err();
    assert!(matches!(busy, TerseError::ControlBusy(_)));
    // 其他控件不受影响
    assert!(h.controller.is_enabled(Control::Export));

    release.send(()).unwrap();
    assert_eq!(task.await.unwrap().unwrap(), "slow");
    assert!(h.controller.is_enabled(Control::WriteForm));
    assert_eq!(h.api.written().len(), 1);
}

#[tokio::test]
async fn test_write_control_reenabled_after_failure() {
    let h = harness(&[]);
    h.api.fail(
        "write",
        ClientError::Rejected {
            status: 500,
            message: "boom".into(),
        },
    );
    let release = h.api.hold_next_write();

    let task = tokio::spawn({
        let controller = h.controller.clone();
        async move {
            controller
                .write(
                    WriteOperation::Upsert,
                    TerseRecord::new("https://a.example", "a"),
                )
                .await
        }
    });

    for _ in 0..100 {
        if !h.controller.is_enabled(Control::WriteForm) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(!h.controller.is_enabled(Control::WriteForm));

    release.send(()).unwrap();
    assert!(task.await.unwrap().is_err());
    assert!(h.controller.is_enabled(Control::WriteForm));

    // 修复后可以立即重新提交
    h.api.recover("write");
    h.controller
        .write(
            WriteOperation::Upsert,
            TerseRecord::new("https://a.example", "a"),
        )
        .await
        .unwrap();
    assert_eq!(h.controller.row_count(), 1);
}

// =============================================================================
// Media preview
// =============================================================================

#[tokio::test]
async fn test_write_fills_preview_from_original_page() {
    let h = harness(&[]);
    h.api.set_meta(MediaPreview {
        title: "Extracted".into(),
        og: [("og:image".to_string(), "cover.png".to_string())].into(),
        ..Default::default()
    });

    h.controller
        .write(WriteOperation::Insert, inheriting_record("promo", ""))
        .await
        .unwrap();

    let written = h.api.written();
    let preview = written[0].media_preview.as_ref().unwrap();
    assert_eq!(preview.title, "Extracted");
    assert_eq!(preview.og.get("og:image").map(String::as_str), Some("cover.png"));
    assert!(preview.inherit_from_original);
    assert_eq!(h.api.call_count("frontend_meta"), 1);
}

#[tokio::test]
async fn test_all_or_nothing_keeps_user_preview() {
    let h = harness_with(
        FakeApi::new(),
        ControllerOptions {
            merge_policy: PreviewMergePolicy::AllOrNothing,
            ..Default::default()
        },
    );
    h.api.set_meta(MediaPreview {
        title: "Extracted".into(),
        og: [("og:image".to_string(), "cover.png".to_string())].into(),
        ..Default::default()
    });

    h.controller
        .write(WriteOperation::Insert, inheriting_record("promo", "Mine"))
        .await
        .unwrap();

    let preview = h.api.written()[0].media_preview.clone().unwrap();
    assert_eq!(preview.title, "Mine");
    assert!(preview.og.is_empty());
}

#[tokio::test]
async fn test_unreachable_original_page_does_not_block_write() {
    let h = harness(&[]);

    h.controller
        .write(WriteOperation::Insert, inheriting_record("promo", "Mine"))
        .await
        .unwrap();

    let preview = h.api.written()[0].media_preview.clone().unwrap();
    assert_eq!(preview.title, "Mine");
    let notes = h.surface.notifications();
    assert!(notes.iter().any(|n| n.level == NotificationLevel::Info));
    assert_eq!(notes.last().unwrap().level, NotificationLevel::Success);
}

#[tokio::test]
async fn test_direct_redirect_drops_preview_without_fetching() {
    let h = harness(&[]);
    let mut record = inheriting_record("plain", "ignored");
    record.redirect_type = Default::default();

    h.controller
        .write(WriteOperation::Insert, record)
        .await
        .unwrap();

    assert!(h.api.written()[0].media_preview.is_none());
    assert_eq!(h.api.call_count("frontend_meta"), 0);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_many_removes_rows() {
    let h = harness(&["abc", "xyz", "foo"]);
    h.controller.refresh().await.unwrap();
    assert_eq!(h.controller.row_count(), 3);

    h.controller.delete_many(&set(&["abc", "xyz"])).await.unwrap();

    assert_eq!(keys(&h.controller.rows()), vec!["foo"]);
    assert!(h.controller.is_enabled(Control::DeleteSelected));
}

#[tokio::test]
async fn test_delete_selected_uses_selection() {
    let h = harness(&["abc", "xyz", "foo"]);
    h.controller.refresh().await.unwrap();
    h.controller.toggle_row("foo");

    h.controller.delete_selected().await.unwrap();
    assert_eq!(keys(&h.controller.rows()), vec!["abc", "xyz"]);
}

#[tokio::test]
async fn test_delete_selected_without_selection_is_rejected_locally() {
    let h = harness(&["abc"]);
    h.controller.refresh().await.unwrap();

    let err = h.controller.delete_selected().await.unwrap_err();
    assert!(matches!(err, TerseError::Validation(_)));
    assert_eq!(h.api.call_count("delete_many"), 0);
}

#[tokio::test]
async fn test_delete_one_missing_key_reports_error() {
    let h = harness(&["abc"]);
    h.controller.refresh().await.unwrap();

    let summaries = h.api.call_count("summarize");
    let err = h.controller.delete_one("nope").await.unwrap_err();
    assert!(matches!(err, TerseError::Rejected(_)));
    assert_eq!(h.controller.row_count(), 1);
    // 失败的删除不触发刷新
    assert_eq!(h.api.call_count("summarize"), summaries);
    assert!(h.controller.is_enabled(Control::DeleteRow));
    assert!(
        h.surface
            .last_notification()
            .unwrap()
            .message
            .contains("Shortened URL not found.")
    );
}

#[tokio::test]
async fn test_delete_many_failure_keeps_rows() {
    let h = harness(&["abc", "xyz", "foo"]);
    h.controller.refresh().await.unwrap();
    h.api.fail(
        "delete_many",
        ClientError::Rejected {
            status: 500,
            message: "boom".into(),
        },
    );
    let summaries = h.api.call_count("summarize");

    let err = h
        .controller
        .delete_many(&set(&["abc", "xyz"]))
        .await
        .unwrap_err();

    assert!(matches!(err, TerseError::Rejected(_)));
    assert_eq!(keys(&h.controller.rows()), vec!["abc", "foo", "xyz"]);
    assert_eq!(h.api.call_count("summarize"), summaries);
    assert!(h.controller.is_enabled(Control::DeleteSelected));
}

#[tokio::test]
async fn test_delete_all_empties_table() {
    let h = harness(&["abc", "xyz"]);
    h.controller.refresh().await.unwrap();

    h.controller.delete_all().await.unwrap();
    assert_eq!(h.controller.row_count(), 0);
}

// =============================================================================
// Export / import
// =============================================================================

#[tokio::test]
async fn test_export_filename_follows_selection() {
    let h = harness(&["abc", "xyz", "foo"]);
    h.controller.refresh().await.unwrap();
    let summarize_calls = h.api.call_count("summarize");

    let file = h.controller.export_selected().await.unwrap();
    assert_eq!(file.filename, "export.json");
    assert_eq!(file.payload.len(), 3);

    h.controller.toggle_row("abc");
    let file = h.controller.export_selected().await.unwrap();
    assert_eq!(file.filename, "abc.json");
    assert_eq!(file.payload.len(), 1);

    h.controller.toggle_row("xyz");
    let file = h.controller.export_selected().await.unwrap();
    assert_eq!(file.filename, "export.json");
    assert_eq!(file.payload.len(), 2);

    // 导出不修改数据，不触发刷新
    assert_eq!(h.api.call_count("summarize"), summarize_calls);
    assert_eq!(h.controller.selected_keys(), set(&["abc", "xyz"]));
}

#[tokio::test]
async fn test_export_failure_is_notified() {
    let h = harness(&["abc"]);
    h.api.fail("export", ClientError::Malformed("expected object".into()));

    let err = h.controller.export(ExportSelection::All).await.unwrap_err();
    assert!(matches!(err, TerseError::MalformedResponse(_)));
    assert!(h.surface.last_notification().unwrap().is_error());
    assert!(h.controller.is_enabled(Control::Export));
}

#[tokio::test]
async fn test_import_then_refresh() {
    let source = harness(&["abc", "xyz"]);
    let file = source
        .controller
        .export(ExportSelection::All)
        .await
        .unwrap();

    let h = harness(&["old"]);
    let count = h.controller.import(&file.payload, true).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(keys(&h.controller.rows()), vec!["abc", "xyz"]);
}

#[tokio::test]
async fn test_import_empty_payload_is_rejected() {
    let h = harness(&[]);
    let err = h
        .controller
        .import(&Default::default(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, TerseError::Validation(_)));
    assert_eq!(h.api.call_count("import"), 0);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_renders_highlighted_table() {
    let h = harness(&["concatenate", "dog"]);

    let table = h.controller.search("cat").await.unwrap();

    assert_eq!(table.matches.len(), 1);
    assert_eq!(
        table.rows(terse_console::highlight::Emphasis::Html)[1][0],
        "https://con<strong>cat</strong>enate.example"
    );
    assert_eq!(h.surface.snapshot().search, Some(table));
}

#[tokio::test]
async fn test_failed_search_keeps_previous_results() {
    let h = harness(&["concatenate"]);
    let first = h.controller.search("cat").await.unwrap();

    let err = h.controller.search("   ").await.unwrap_err();
    assert!(matches!(err, TerseError::Validation(_)));
    assert_eq!(h.api.call_count("search"), 1);

    h.api.fail("search", ClientError::Transport("timeout".into()));
    assert!(h.controller.search("dog").await.is_err());

    assert_eq!(h.controller.search_results(), Some(first.clone()));
    assert_eq!(h.surface.snapshot().search, Some(first));
}

// =============================================================================
// Misc
// =============================================================================

#[tokio::test]
async fn test_load_prefix_and_record() {
    let h = harness(&["abc"]);

    assert_eq!(h.controller.load_prefix().await.unwrap(), "https://t.example/");
    assert_eq!(h.controller.prefix().as_deref(), Some("https://t.example/"));

    let record = h.controller.load_record("abc").await.unwrap();
    assert_eq!(record.original_url, "https://abc.example");
    assert!(h.controller.load_record("zzz").await.is_err());
}

#[tokio::test]
async fn test_html_surface_renders_row_ids_and_checkboxes() {
    let api = Arc::new(FakeApi::seeded(&["abc", "xyz"]));
    let surface = Arc::new(HtmlSurface::new());
    let controller = EntityTableController::new(api, surface.clone(), Default::default());

    controller.refresh().await.unwrap();
    controller.toggle_row("xyz");

    let html = surface.table_html();
    assert!(html.contains("<tr id=\"abc\">"));
    assert!(html.contains("id=\"abcCheckbox\" value=\"abc\">"));
    assert!(html.contains("id=\"xyzCheckbox\" value=\"xyz\" checked>"));
}
