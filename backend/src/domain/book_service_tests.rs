//! Tests for the catalogue and loan ledger service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    BookTypeCount, LoanRepositoryError, MockBookRepository, MockLoanRepository,
    MockUserRepository, UserCommand, UserCreateRequest,
};
use crate::domain::{BookId, BookType, ErrorCode, LoanId, UserId, UserService};
use crate::outbound::memory::InMemoryLibraryStore;
use rstest::{fixture, rstest};

type StoreBookService =
    BookService<InMemoryLibraryStore, InMemoryLibraryStore, InMemoryLibraryStore>;
type MockBookService = BookService<MockBookRepository, MockUserRepository, MockLoanRepository>;

fn book_name(raw: &str) -> BookName {
    BookName::new(raw).expect("valid title")
}

fn user_name(raw: &str) -> UserName {
    UserName::new(raw).expect("valid user name")
}

fn loan_request(user: &str, book: &str) -> BookLoanRequest {
    BookLoanRequest {
        user_name: user_name(user),
        book_name: book_name(book),
    }
}

fn return_request(user: &str, book: &str) -> BookReturnRequest {
    BookReturnRequest {
        user_name: user_name(user),
        book_name: book_name(book),
    }
}

#[fixture]
fn store() -> Arc<InMemoryLibraryStore> {
    Arc::new(InMemoryLibraryStore::new())
}

fn make_service(store: &Arc<InMemoryLibraryStore>) -> StoreBookService {
    BookService::new(Arc::clone(store), Arc::clone(store), Arc::clone(store))
}

async fn register(store: &Arc<InMemoryLibraryStore>, name: &str) -> User {
    UserService::new(Arc::clone(store), Arc::clone(store))
        .save_user(UserCreateRequest {
            name: user_name(name),
            age: None,
        })
        .await
        .expect("user saved")
}

async fn shelve(service: &StoreBookService, name: &str, book_type: Option<BookType>) -> Book {
    service
        .save_book(BookRequest {
            name: book_name(name),
            book_type,
        })
        .await
        .expect("book saved")
}

fn make_mock_service(
    books: MockBookRepository,
    users: MockUserRepository,
    loans: MockLoanRepository,
) -> MockBookService {
    BookService::new(Arc::new(books), Arc::new(users), Arc::new(loans))
}

#[rstest]
#[tokio::test]
async fn save_book_stores_title_and_type(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);

    let saved = shelve(&service, "TEST BOOK", Some(BookType::Computer)).await;

    assert_eq!(saved.name().as_ref(), "TEST BOOK");
    assert_eq!(saved.book_type(), BookType::Computer);
    let catalogue = store.books_snapshot();
    assert_eq!(catalogue, vec![saved]);
}

#[rstest]
#[tokio::test]
async fn save_book_without_type_is_unspecified(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);

    let saved = shelve(&service, "TEST BOOK", None).await;

    assert_eq!(saved.book_type(), BookType::Unspecified);
}

#[rstest]
#[tokio::test]
async fn loan_book_records_active_loan(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);
    let user = register(&store, "A").await;
    shelve(&service, "TEST BOOK", Some(BookType::Computer)).await;

    let loan = service
        .loan_book(loan_request("A", "TEST BOOK"))
        .await
        .expect("loan succeeds");

    assert_eq!(loan.user_id(), user.id());
    assert_eq!(loan.book_name().as_ref(), "TEST BOOK");
    assert_eq!(loan.status(), LoanStatus::Loaned);
    assert_eq!(store.loans_snapshot(), vec![loan]);
}

#[rstest]
#[tokio::test]
async fn second_loan_of_same_title_is_rejected(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);
    let first = register(&store, "A").await;
    register(&store, "B").await;
    shelve(&service, "TEST BOOK", Some(BookType::Computer)).await;
    service
        .loan_book(loan_request("A", "TEST BOOK"))
        .await
        .expect("first loan succeeds");

    let error = service
        .loan_book(loan_request("B", "TEST BOOK"))
        .await
        .expect_err("title already out");

    assert_eq!(error.code(), ErrorCode::InvalidState);
    assert_eq!(error.message(), ALREADY_ON_LOAN);
    let ledger = store.loans_snapshot();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].user_id(), first.id());
    assert_eq!(ledger[0].status(), LoanStatus::Loaned);
}

#[rstest]
#[case("GHOST", "TEST BOOK")]
#[case("A", "MISSING BOOK")]
#[tokio::test]
async fn loan_book_requires_known_user_and_title(
    store: Arc<InMemoryLibraryStore>,
    #[case] user: &str,
    #[case] book: &str,
) {
    let service = make_service(&store);
    register(&store, "A").await;
    shelve(&service, "TEST BOOK", None).await;

    let error = service
        .loan_book(loan_request(user, book))
        .await
        .expect_err("lookup fails");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(store.loans_snapshot().is_empty());
}

#[rstest]
#[tokio::test]
async fn return_book_closes_the_loan(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);
    register(&store, "A").await;
    shelve(&service, "TEST BOOK", Some(BookType::Computer)).await;
    service
        .loan_book(loan_request("A", "TEST BOOK"))
        .await
        .expect("loan succeeds");

    let returned = service
        .return_book(return_request("A", "TEST BOOK"))
        .await
        .expect("return succeeds");

    assert_eq!(returned.status(), LoanStatus::Returned);
    let ledger = store.loans_snapshot();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].status(), LoanStatus::Returned);
}

#[rstest]
#[tokio::test]
async fn returned_title_can_be_lent_again(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);
    register(&store, "A").await;
    register(&store, "B").await;
    shelve(&service, "TEST BOOK", None).await;
    service
        .loan_book(loan_request("A", "TEST BOOK"))
        .await
        .expect("first loan");
    service
        .return_book(return_request("A", "TEST BOOK"))
        .await
        .expect("return");

    service
        .loan_book(loan_request("B", "TEST BOOK"))
        .await
        .expect("second loan");

    let statuses: Vec<_> = store
        .loans_snapshot()
        .iter()
        .map(LoanRecord::status)
        .collect();
    assert_eq!(statuses, vec![LoanStatus::Returned, LoanStatus::Loaned]);
}

#[rstest]
#[tokio::test]
async fn return_by_another_user_is_not_found(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);
    register(&store, "A").await;
    register(&store, "B").await;
    shelve(&service, "TEST BOOK", None).await;
    service
        .loan_book(loan_request("A", "TEST BOOK"))
        .await
        .expect("loan succeeds");

    let error = service
        .return_book(return_request("B", "TEST BOOK"))
        .await
        .expect_err("B holds no loan");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(store.loans_snapshot()[0].status(), LoanStatus::Loaned);
}

#[rstest]
#[tokio::test]
async fn return_without_active_loan_is_not_found(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);
    register(&store, "A").await;
    shelve(&service, "TEST BOOK", None).await;

    let error = service
        .return_book(return_request("A", "TEST BOOK"))
        .await
        .expect_err("nothing to return");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn count_loaned_books_ignores_returned_records(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);
    let user = register(&store, "A").await;
    for (title, status) in [
        ("A", LoanStatus::Loaned),
        ("B", LoanStatus::Returned),
        ("C", LoanStatus::Returned),
    ] {
        store
            .seed_loan(user.id(), book_name(title), status)
            .expect("seeded");
    }

    let count = service.count_loaned_books().await.expect("count");

    assert_eq!(count, 1);
}

#[rstest]
#[tokio::test]
async fn book_statistics_counts_populated_categories(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);
    shelve(&service, "A", Some(BookType::Computer)).await;
    shelve(&service, "B", Some(BookType::Computer)).await;
    shelve(&service, "C", Some(BookType::Science)).await;

    let stats = service.book_statistics().await.expect("statistics");

    assert_eq!(
        stats,
        vec![
            BookStatResponse {
                book_type: BookType::Computer,
                count: 2,
            },
            BookStatResponse {
                book_type: BookType::Science,
                count: 1,
            },
        ]
    );
}

#[rstest]
#[tokio::test]
async fn book_statistics_is_empty_for_empty_catalogue(store: Arc<InMemoryLibraryStore>) {
    let service = make_service(&store);

    let stats = service.book_statistics().await.expect("statistics");

    assert!(stats.is_empty());
}

#[tokio::test]
async fn book_statistics_orders_by_category_declaration() {
    let mut books = MockBookRepository::new();
    books.expect_count_by_type().times(1).return_once(|| {
        Ok(vec![
            BookTypeCount {
                book_type: BookType::Art,
                count: 3,
            },
            BookTypeCount {
                book_type: BookType::Social,
                count: 2,
            },
            BookTypeCount {
                book_type: BookType::Computer,
                count: 1,
            },
        ])
    });
    let service = make_mock_service(
        books,
        MockUserRepository::new(),
        MockLoanRepository::new(),
    );

    let stats = service.book_statistics().await.expect("statistics");

    let entries: Vec<_> = stats
        .iter()
        .map(|entry| (entry.book_type, entry.count))
        .collect();
    assert_eq!(
        entries,
        vec![
            (BookType::Computer, 1),
            (BookType::Social, 2),
            (BookType::Art, 3)
        ]
    );
}

#[tokio::test]
async fn concurrent_insert_conflict_maps_to_invalid_state() {
    let user = User::new(UserId::new(1), user_name("A"), None);
    let book = Book::new(BookId::new(1), book_name("TEST BOOK"), BookType::Art);

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_name()
        .times(1)
        .return_once(move |_| Ok(Some(user)));
    let mut books = MockBookRepository::new();
    books
        .expect_find_by_name()
        .times(1)
        .return_once(move |_| Ok(Some(book)));
    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_active_by_book_name()
        .times(1)
        .return_once(|_| Ok(None));
    loans
        .expect_insert()
        .times(1)
        .return_once(|loan| Err(LoanRepositoryError::already_loaned(loan.book_name.as_ref())));
    let service = make_mock_service(books, users, loans);

    let error = service
        .loan_book(loan_request("A", "TEST BOOK"))
        .await
        .expect_err("insert conflict");

    assert_eq!(error.code(), ErrorCode::InvalidState);
    assert_eq!(error.message(), ALREADY_ON_LOAN);
}

#[tokio::test]
async fn stale_return_maps_to_not_found() {
    let user = User::new(UserId::new(1), user_name("A"), None);
    let loan = LoanRecord::new(
        LoanId::new(7),
        UserId::new(1),
        book_name("TEST BOOK"),
        LoanStatus::Loaned,
    );

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_name()
        .times(1)
        .return_once(move |_| Ok(Some(user)));
    let mut loans = MockLoanRepository::new();
    loans
        .expect_find_active_by_book_name()
        .times(1)
        .return_once(move |_| Ok(Some(loan)));
    loans
        .expect_mark_returned()
        .withf(|id| *id == LoanId::new(7))
        .times(1)
        .return_once(|id| Err(LoanRepositoryError::not_active(id)));
    let service = make_mock_service(MockBookRepository::new(), users, loans);

    let error = service
        .return_book(return_request("A", "TEST BOOK"))
        .await
        .expect_err("loan closed concurrently");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut loans = MockLoanRepository::new();
    loans
        .expect_count_by_status()
        .times(1)
        .return_once(|_| Err(LoanRepositoryError::connection("pool timed out")));
    let service = make_mock_service(
        MockBookRepository::new(),
        MockUserRepository::new(),
        loans,
    );

    let error = service
        .count_loaned_books()
        .await
        .expect_err("store offline");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
