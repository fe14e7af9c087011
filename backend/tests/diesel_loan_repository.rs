//! Integration tests for `DieselLoanRepository` against embedded PostgreSQL.
//!
//! These tests check the ledger rules the schema enforces: the partial unique
//! index on active titles, the conditional return update and the status
//! counts. Each test runs in its own migrated temporary database.

use library_backend::domain::ports::{LoanRepository, LoanRepositoryError, UserRepository};
use library_backend::domain::{BookName, LoanId, LoanStatus, NewLoan, NewUser, User, UserName};
use library_backend::outbound::persistence::{DieselLoanRepository, DieselUserRepository};
use rstest::{fixture, rstest};

mod support;

use support::{PgDatabase, handle_cluster_setup_failure, provision_database};

// -----------------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------------

#[fixture]
fn pg() -> Option<PgDatabase> {
    match provision_database() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn title(raw: &str) -> BookName {
    BookName::new(raw).expect("valid title")
}

fn register(db: &PgDatabase, name: &str) -> User {
    let users = DieselUserRepository::new(db.pool());
    db.block_on(users.insert(&NewUser {
        name: UserName::new(name).expect("valid user name"),
        age: None,
    }))
    .expect("user inserted")
}

fn loan_for(user: &User, book: &str) -> NewLoan {
    NewLoan {
        user_id: user.id(),
        book_name: title(book),
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[rstest]
fn second_active_loan_for_a_title_is_rejected(pg: Option<PgDatabase>) {
    let Some(db) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: second_active_loan_for_a_title_is_rejected skipped");
        return;
    };
    let loans = DieselLoanRepository::new(db.pool());
    let first = register(&db, "A");
    let second = register(&db, "B");

    let loan = db
        .block_on(loans.insert(&loan_for(&first, "TEST BOOK")))
        .expect("first loan recorded");
    let error = db
        .block_on(loans.insert(&loan_for(&second, "TEST BOOK")))
        .expect_err("title already out");

    assert_eq!(loan.status(), LoanStatus::Loaned);
    assert!(
        matches!(error, LoanRepositoryError::AlreadyLoaned { ref book_name } if book_name == "TEST BOOK"),
        "expected AlreadyLoaned, got {error:?}"
    );
    let ledger = db.block_on(loans.find_all()).expect("ledger");
    assert_eq!(ledger, vec![loan]);
}

#[rstest]
fn concurrent_loans_of_one_title_have_a_single_winner(pg: Option<PgDatabase>) {
    let Some(db) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_loans_of_one_title_have_a_single_winner skipped");
        return;
    };
    let loans = DieselLoanRepository::new(db.pool());
    let first = register(&db, "A");
    let second = register(&db, "B");
    let first_loan = loan_for(&first, "TEST BOOK");
    let second_loan = loan_for(&second, "TEST BOOK");

    let (left, right) = db.block_on(async {
        tokio::join!(loans.insert(&first_loan), loans.insert(&second_loan))
    });

    let outcomes = [left, right];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(LoanRepositoryError::AlreadyLoaned { .. })
    )));
    assert_eq!(
        db.block_on(loans.count_by_status(LoanStatus::Loaned))
            .expect("count"),
        1
    );
}

#[rstest]
fn mark_returned_applies_once(pg: Option<PgDatabase>) {
    let Some(db) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: mark_returned_applies_once skipped");
        return;
    };
    let loans = DieselLoanRepository::new(db.pool());
    let reader = register(&db, "A");
    let loan = db
        .block_on(loans.insert(&loan_for(&reader, "TEST BOOK")))
        .expect("loan recorded");

    db.block_on(loans.mark_returned(loan.id()))
        .expect("first return applies");
    let error = db
        .block_on(loans.mark_returned(loan.id()))
        .expect_err("second return is rejected");

    assert!(
        matches!(error, LoanRepositoryError::NotActive { id } if id == loan.id()),
        "expected NotActive, got {error:?}"
    );
    let active = db
        .block_on(loans.find_active_by_book_name(&title("TEST BOOK")))
        .expect("lookup");
    assert!(active.is_none());
}

#[rstest]
fn returned_title_can_be_lent_again(pg: Option<PgDatabase>) {
    let Some(db) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: returned_title_can_be_lent_again skipped");
        return;
    };
    let loans = DieselLoanRepository::new(db.pool());
    let first = register(&db, "A");
    let second = register(&db, "B");
    let original = db
        .block_on(loans.insert(&loan_for(&first, "TEST BOOK")))
        .expect("first loan");
    db.block_on(loans.mark_returned(original.id()))
        .expect("returned");

    let relent = db
        .block_on(loans.insert(&loan_for(&second, "TEST BOOK")))
        .expect("title is available again");

    let active = db
        .block_on(loans.find_active_by_book_name(&title("TEST BOOK")))
        .expect("lookup")
        .expect("active loan");
    assert_eq!(active, relent);
    assert_eq!(active.user_id(), second.id());
    assert_eq!(
        db.block_on(loans.count_by_status(LoanStatus::Returned))
            .expect("count"),
        1
    );
    assert_eq!(
        db.block_on(loans.count_by_status(LoanStatus::Loaned))
            .expect("count"),
        1
    );
}

#[rstest]
fn unknown_loan_is_not_active(pg: Option<PgDatabase>) {
    let Some(db) = pg else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_loan_is_not_active skipped");
        return;
    };
    let loans = DieselLoanRepository::new(db.pool());
    let reader = register(&db, "A");
    let loan = db
        .block_on(loans.insert(&loan_for(&reader, "TEST BOOK")))
        .expect("loan recorded");
    let missing = loan.id().as_i64() + 100;

    let error = db
        .block_on(loans.mark_returned(LoanId::new(missing)))
        .expect_err("no such loan");

    assert!(matches!(error, LoanRepositoryError::NotActive { .. }));
}
