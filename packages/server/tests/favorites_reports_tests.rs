//! Integration tests for member favorites and entry reports.

mod common;

use crate::common::*;
use test_context::test_context;
use vsl_core::common::{DictionaryEntryId, MemberId, ReportId, ServiceError};
use vsl_core::domains::dictionary::actions as dictionary;
use vsl_core::domains::favorites::actions as favorites;
use vsl_core::domains::history::actions as history;
use vsl_core::domains::moderation::actions as moderation;
use vsl_core::domains::reports::{actions as reports, ReportStatus};

// =============================================================================
// Favorites
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn toggle_favorite_adds_then_removes(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool).await;
    let entry = create_entry(&ctx.deps, "yêu", Some("love")).await;

    assert!(favorites::toggle_favorite(member.id, entry.id, &ctx.deps).await.unwrap());
    assert!(favorites::is_favorite(member.id, entry.id, &ctx.deps).await.unwrap());

    assert!(!favorites::toggle_favorite(member.id, entry.id, &ctx.deps).await.unwrap());
    assert!(!favorites::is_favorite(member.id, entry.id, &ctx.deps).await.unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn toggle_favorite_requires_existing_member_and_entry(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool).await;
    let entry = create_entry(&ctx.deps, "ghét", None).await;

    let missing_entry =
        favorites::toggle_favorite(member.id, DictionaryEntryId::new(), &ctx.deps).await;
    assert!(matches!(missing_entry, Err(ServiceError::NotFound { .. })));

    let missing_member = favorites::toggle_favorite(
        MemberId::new(),
        entry.id,
        &ctx.deps,
    )
    .await;
    assert!(matches!(missing_member, Err(ServiceError::NotFound { .. })));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_favorites_pages_newest_first(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool).await;
    let other = create_member(&ctx.db_pool).await;
    let words = ["xuân", "hạ", "thu", "đông"];
    for word in words {
        let entry = create_entry(&ctx.deps, word, None).await;
        favorites::toggle_favorite(member.id, entry.id, &ctx.deps)
            .await
            .unwrap();
    }

    let first = favorites::list_favorites(member.id, 0, 3, &ctx.deps).await.unwrap();
    assert_eq!(first.total, 4);
    assert_eq!(first.size, 3);
    let names: Vec<_> = first.items.iter().map(|f| f.word.as_str()).collect();
    assert_eq!(names, vec!["đông", "thu", "hạ"]);

    let second = favorites::list_favorites(member.id, 1, 3, &ctx.deps).await.unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].word, "xuân");

    // Unusable paging input is normalized rather than rejected.
    let normalized = favorites::list_favorites(member.id, -1, 0, &ctx.deps).await.unwrap();
    assert_eq!(normalized.page, 0);
    assert_eq!(normalized.size, favorites::DEFAULT_PAGE_SIZE);
    assert_eq!(normalized.items.len(), 4);

    let empty = favorites::list_favorites(other.id, 0, 10, &ctx.deps).await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(empty.items.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_entry_removes_its_favorites(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool).await;
    let entry = create_entry(&ctx.deps, "bạn", Some("friend")).await;
    favorites::toggle_favorite(member.id, entry.id, &ctx.deps)
        .await
        .unwrap();

    dictionary::delete_word(entry.id, &ctx.deps).await.unwrap();

    let page = favorites::list_favorites(member.id, 0, 10, &ctx.deps).await.unwrap();
    assert_eq!(page.total, 0);
}

// =============================================================================
// Reports
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn report_lifecycle(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool).await;
    let entry = create_entry(&ctx.deps, "trời", Some("sky")).await;

    let report = reports::create_report(member.id, entry.id, "  wrong video  ", &ctx.deps)
        .await
        .unwrap();
    assert_eq!(report.reason, "wrong video");
    assert_eq!(report.status, ReportStatus::Open.to_string());

    let open = reports::list_open_reports(&ctx.deps).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, report.id);

    let resolved = reports::resolve_report(report.id, &ctx.deps).await.unwrap();
    assert_eq!(resolved.status, ReportStatus::Resolved.to_string());
    assert!(reports::list_open_reports(&ctx.deps).await.unwrap().is_empty());

    let again = reports::resolve_report(report.id, &ctx.deps).await;
    assert!(matches!(again, Err(ServiceError::InvalidState(_))));

    let missing = reports::resolve_report(ReportId::new(), &ctx.deps).await;
    assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_report_validates_input(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool).await;
    let entry = create_entry(&ctx.deps, "đất", None).await;

    let blank = reports::create_report(member.id, entry.id, "   ", &ctx.deps).await;
    assert!(matches!(blank, Err(ServiceError::Validation(_))));

    let missing_entry =
        reports::create_report(member.id, DictionaryEntryId::new(), "typo", &ctx.deps).await;
    assert!(matches!(missing_entry, Err(ServiceError::NotFound { .. })));

    assert!(reports::list_open_reports(&ctx.deps).await.unwrap().is_empty());
}

// =============================================================================
// Search history
// =============================================================================

async fn history_rows(ctx: &TestHarness) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM search_history")
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn guest_searches_leave_no_history(ctx: &TestHarness) {
    let entry = create_entry(&ctx.deps, "trăng", Some("moon")).await;

    history::log_search(None, "trăng", entry.id, &ctx.deps).await;

    assert_eq!(history_rows(ctx).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn member_history_lists_newest_lookup_first(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool).await;
    let other = create_member(&ctx.db_pool).await;
    let sun = create_entry(&ctx.deps, "mặt trời", Some("sun")).await;
    let star = create_entry(&ctx.deps, "ngôi sao", Some("star")).await;

    history::log_search(Some(member.id), "sun", sun.id, &ctx.deps).await;
    history::log_search(Some(member.id), " sao ", star.id, &ctx.deps).await;
    history::log_search(Some(member.id), "   ", star.id, &ctx.deps).await;
    history::log_search(Some(other.id), "sun", sun.id, &ctx.deps).await;

    let lookups = history::list_history(member.id, &ctx.deps).await.unwrap();
    assert_eq!(lookups.len(), 2);
    assert_eq!(lookups[0].word, "ngôi sao");
    assert_eq!(lookups[0].search_query, "sao");
    assert_eq!(lookups[1].entry_id, sun.id);

    let missing = history::list_history(MemberId::new(), &ctx.deps).await;
    assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn member_with_contributions_cannot_be_deleted(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool).await;
    let contribution = moderation::submit_contribution(member.id, payload("sấm", None), &ctx.deps)
        .await
        .unwrap();

    let deleted = sqlx::query("DELETE FROM members WHERE id = $1")
        .bind(member.id)
        .execute(&ctx.db_pool)
        .await;

    assert!(deleted.is_err());
    let kept = moderation::get_by_id(contribution.id, &ctx.deps).await.unwrap();
    assert_eq!(kept.member_id, member.id);
}
