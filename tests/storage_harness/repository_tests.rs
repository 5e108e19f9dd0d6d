//! Macro-generated test suite for repository contract validation.
//!
//! The `repository_tests!` macro generates a test module that validates any
//! `InvoiceRepository + TagRepository` implementation against the full
//! contract: CRUD, filtering, id assignment, tag associations and concurrent
//! access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use invoice_api::storage::InMemoryInvoiceRepository;
//!
//! repository_tests!(InMemoryInvoiceRepository::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_find`: create then retrieve, verify all fields
//! - `test_create_sets_timestamps`: created_at equals updated_at
//! - `test_create_minimal_draft`: optional fields stay null
//! - `test_create_truncates_due_date`: create agrees with find_by_id
//! - `test_find_nonexistent`: unknown id returns None
//! - `test_list_empty` / `test_list_in_id_order`
//! - `test_delete_existing` / `test_delete_nonexistent`
//! - `test_ids_not_reused_after_delete`
//!
//! ## Filtering
//! - `test_filter_by_status`, `test_filter_unknown_status`
//! - `test_filter_due_date_window`, `test_filter_open_bounds`
//! - `test_filter_combined`
//!
//! ## Tags
//! - `test_attach_and_navigate`, `test_attach_is_idempotent`
//! - `test_attach_unknown_records`, `test_delete_cascades_associations`
//!
//! ## Concurrency
//! - `test_concurrent_creates_get_distinct_ids`

/// Generate a repository conformance test suite.
///
/// `$factory` must evaluate to a fresh `InvoiceRepository + TagRepository`
/// that is also `Clone + 'static`. It is re-evaluated for each test and may
/// contain `.await`.
#[macro_export]
macro_rules! repository_tests {
    ($factory:expr) => {
        mod repository_contract_tests {
            use super::*;
            use invoice_api::core::entity::InvoiceStatus;
            use invoice_api::core::query::InvoiceFilter;
            use invoice_api::core::service::{InvoiceRepository, TagRepository};

            async fn seeded() -> (
                impl InvoiceRepository + TagRepository + Clone + 'static,
                Vec<invoice_api::core::entity::Invoice>,
            ) {
                let repo = $factory;
                let mut created = Vec::new();
                for draft in filter_fixture() {
                    created.push(repo.create(draft).await.unwrap());
                }
                (repo, created)
            }

            // ==================================================================
            // CRUD - Create & Find
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_find() {
                let repo = $factory;
                let draft = create_test_draft("INV-100", InvoiceStatus::Sent, Some(date(2024, 5, 31)));

                let created = repo.create(draft.clone()).await.unwrap();
                assert!(created.id > 0);
                assert_eq!(created.invoice_number, "INV-100");
                assert_eq!(created.customer_name, draft.customer_name);
                assert_eq!(created.title, draft.title);
                assert_eq!(created.description, draft.description);
                assert_eq!(created.status, InvoiceStatus::Sent);
                assert_eq!(created.due_date, Some(date(2024, 5, 31)));

                let found = repo.find_by_id(created.id).await.unwrap();
                assert_eq!(found, Some(created));
            }

            #[tokio::test]
            async fn test_create_sets_timestamps() {
                let repo = $factory;
                let created = repo.create(create_minimal_draft("INV-101")).await.unwrap();

                assert_eq!(created.created_at, created.updated_at);
                assert_eq!(created.created_at.and_utc().timestamp_subsec_nanos(), 0);
            }

            #[tokio::test]
            async fn test_create_minimal_draft() {
                let repo = $factory;
                let created = repo.create(create_minimal_draft("INV-102")).await.unwrap();

                let found = repo.find_by_id(created.id).await.unwrap().unwrap();
                assert_eq!(found.description, None);
                assert_eq!(found.due_date, None);
                assert_eq!(found.status, InvoiceStatus::Draft);
            }

            #[tokio::test]
            async fn test_create_truncates_due_date() {
                let repo = $factory;
                let due = date(2024, 5, 31) + chrono::Duration::milliseconds(1_500);
                let draft = create_test_draft("INV-107", InvoiceStatus::Sent, Some(due));

                let created = repo.create(draft).await.unwrap();
                assert_eq!(
                    created.due_date,
                    Some(date(2024, 5, 31) + chrono::Duration::seconds(1))
                );
                assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created));
            }

            #[tokio::test]
            async fn test_find_nonexistent() {
                let repo = $factory;
                assert!(repo.find_by_id(9999).await.unwrap().is_none());
            }

            // ==================================================================
            // CRUD - List
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let repo = $factory;
                assert!(repo.list(&InvoiceFilter::all()).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_in_id_order() {
                let (repo, created) = seeded().await;

                let listed = repo.list(&InvoiceFilter::all()).await.unwrap();
                assert_eq!(listed, created);
                assert!(listed.windows(2).all(|w| w[0].id < w[1].id));
            }

            // ==================================================================
            // CRUD - Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_existing() {
                let (repo, created) = seeded().await;
                let target = created[1].clone();

                let deleted = repo.delete(target.id).await.unwrap();
                assert_eq!(deleted, Some(target.clone()));
                assert!(repo.find_by_id(target.id).await.unwrap().is_none());
                assert_eq!(repo.list(&InvoiceFilter::all()).await.unwrap().len(), 4);
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let repo = $factory;
                assert!(repo.delete(9999).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_twice() {
                let repo = $factory;
                let created = repo.create(create_minimal_draft("INV-103")).await.unwrap();

                assert!(repo.delete(created.id).await.unwrap().is_some());
                assert!(repo.delete(created.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_ids_not_reused_after_delete() {
                let repo = $factory;
                let first = repo.create(create_minimal_draft("INV-104")).await.unwrap();
                let second = repo.create(create_minimal_draft("INV-105")).await.unwrap();
                repo.delete(second.id).await.unwrap();

                let third = repo.create(create_minimal_draft("INV-106")).await.unwrap();
                assert!(second.id > first.id);
                assert!(third.id > second.id);
            }

            // ==================================================================
            // Filtering
            // ==================================================================

            #[tokio::test]
            async fn test_filter_by_status() {
                let (repo, _) = seeded().await;

                let paid = repo
                    .list(&InvoiceFilter::all().with_status("paid"))
                    .await
                    .unwrap();
                assert_eq!(numbers(&paid), vec!["INV-001", "INV-002"]);
                assert!(paid.iter().all(|i| i.status == InvoiceStatus::Paid));
            }

            #[tokio::test]
            async fn test_filter_unknown_status() {
                let (repo, _) = seeded().await;

                let none = repo
                    .list(&InvoiceFilter::all().with_status("refunded"))
                    .await
                    .unwrap();
                assert!(none.is_empty());
            }

            #[tokio::test]
            async fn test_filter_due_date_window() {
                let (repo, _) = seeded().await;
                let filter = InvoiceFilter::all()
                    .with_due_date_from(date(2024, 5, 1))
                    .with_due_date_to(date(2024, 5, 31));

                let may = repo.list(&filter).await.unwrap();
                assert_eq!(numbers(&may), vec!["INV-002", "INV-003"]);
            }

            #[tokio::test]
            async fn test_filter_open_bounds() {
                let (repo, _) = seeded().await;

                let from = repo
                    .list(&InvoiceFilter::all().with_due_date_from(date(2024, 5, 31)))
                    .await
                    .unwrap();
                assert_eq!(numbers(&from), vec!["INV-003", "INV-004"]);

                let to = repo
                    .list(&InvoiceFilter::all().with_due_date_to(date(2024, 5, 15)))
                    .await
                    .unwrap();
                assert_eq!(numbers(&to), vec!["INV-001", "INV-002"]);
            }

            #[tokio::test]
            async fn test_filter_combined() {
                let (repo, _) = seeded().await;
                let filter = InvoiceFilter::all()
                    .with_status("paid")
                    .with_due_date_from(date(2024, 5, 1));

                let result = repo.list(&filter).await.unwrap();
                assert_eq!(numbers(&result), vec!["INV-002"]);
            }

            // ==================================================================
            // Tags
            // ==================================================================

            #[tokio::test]
            async fn test_attach_and_navigate() {
                let (repo, created) = seeded().await;
                let urgent = repo.create_tag("urgent").await.unwrap();
                let q2 = repo.create_tag("q2").await.unwrap();

                assert!(repo.attach_tag(created[0].id, urgent.id).await.unwrap());
                assert!(repo.attach_tag(created[0].id, q2.id).await.unwrap());
                assert!(repo.attach_tag(created[2].id, urgent.id).await.unwrap());

                let tags = repo.tags_for_invoice(created[0].id).await.unwrap();
                assert_eq!(tags, vec![urgent.clone(), q2.clone()]);

                let tagged = repo.invoices_for_tag(urgent.id).await.unwrap();
                assert_eq!(numbers(&tagged), vec!["INV-001", "INV-003"]);

                assert!(repo.tags_for_invoice(created[1].id).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_attach_is_idempotent() {
                let (repo, created) = seeded().await;
                let tag = repo.create_tag("urgent").await.unwrap();

                assert!(repo.attach_tag(created[0].id, tag.id).await.unwrap());
                assert!(repo.attach_tag(created[0].id, tag.id).await.unwrap());
                assert_eq!(repo.tags_for_invoice(created[0].id).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_attach_unknown_records() {
                let (repo, created) = seeded().await;
                let tag = repo.create_tag("urgent").await.unwrap();

                assert!(!repo.attach_tag(9999, tag.id).await.unwrap());
                assert!(!repo.attach_tag(created[0].id, 9999).await.unwrap());
                assert!(repo.invoices_for_tag(tag.id).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_cascades_associations() {
                let (repo, created) = seeded().await;
                let tag = repo.create_tag("urgent").await.unwrap();
                repo.attach_tag(created[0].id, tag.id).await.unwrap();
                repo.attach_tag(created[1].id, tag.id).await.unwrap();

                repo.delete(created[0].id).await.unwrap();

                let tagged = repo.invoices_for_tag(tag.id).await.unwrap();
                assert_eq!(numbers(&tagged), vec!["INV-002"]);
                assert!(repo.tags_for_invoice(created[0].id).await.unwrap().is_empty());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates_get_distinct_ids() {
                let repo = $factory;

                let handles: Vec<_> = (0..10)
                    .map(|i| {
                        let repo = repo.clone();
                        tokio::spawn(async move {
                            repo.create(create_minimal_draft(&format!("INV-C{:02}", i)))
                                .await
                                .unwrap()
                        })
                    })
                    .collect();

                let mut ids = Vec::new();
                for handle in handles {
                    ids.push(handle.await.unwrap().id);
                }
                ids.sort_unstable();
                ids.dedup();
                assert_eq!(ids.len(), 10);
                assert_eq!(repo.list(&InvoiceFilter::all()).await.unwrap().len(), 10);
            }
        }
    };
}
