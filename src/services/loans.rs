//! Loan service: due date renewal and the borrowed-books listing

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstanceDetails, LoanStatus},
        renewal::{clean_renewal_date, RenewalForm},
        PageQuery,
    },
    repository::Repository,
};

/// Result of a renewal submission
#[derive(Debug)]
pub enum RenewalOutcome {
    /// Due date persisted
    Renewed { instance_id: Uuid, due_back: NaiveDate },
    /// Date refused, form to re-present
    Rejected(RenewalForm),
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Unbound renewal form for an instance, pre-filled with the suggested date
    pub async fn renewal_form(&self, instance_id: Uuid, today: NaiveDate) -> AppResult<RenewalForm> {
        let instance = self.repository.instances.get_by_id(instance_id).await?;
        Ok(RenewalForm::initial(BookInstanceDetails::new(instance, today), today))
    }

    /// Validate a submitted renewal date and persist it as the instance's new due date.
    ///
    /// Only `due_back` is written; the loan status is left as it is.
    pub async fn renew(&self, instance_id: Uuid, submitted: &str, today: NaiveDate) -> AppResult<RenewalOutcome> {
        let instance = self.repository.instances.get_by_id(instance_id).await?;

        let due_back = match clean_renewal_date(submitted, today) {
            Ok(date) => date,
            Err(error) => {
                tracing::debug!(%instance_id, submitted, code = %error.code, "Renewal date rejected");
                let details = BookInstanceDetails::new(instance, today);
                return Ok(RenewalOutcome::Rejected(RenewalForm::rejected(details, submitted, &error)));
            }
        };

        if instance.status != LoanStatus::OnLoan {
            tracing::warn!(%instance_id, status = %instance.status, "Renewing an instance that is not on loan");
        }

        self.repository.instances.update_due_back(instance_id, due_back).await?;
        tracing::info!(%instance_id, %due_back, "Book instance renewed");

        Ok(RenewalOutcome::Renewed { instance_id, due_back })
    }

    /// Instances on loan to `borrower_id`, soonest due first
    pub async fn borrowed_by(
        &self,
        borrower_id: i32,
        page: &PageQuery,
        today: NaiveDate,
    ) -> AppResult<(Vec<BookInstanceDetails>, i64)> {
        let (instances, total) = self
            .repository
            .instances
            .list_for_borrower(borrower_id, LoanStatus::OnLoan, page.offset(), page.limit())
            .await?;

        let details = instances
            .into_iter()
            .map(|instance| BookInstanceDetails::new(instance, today))
            .collect();

        Ok((details, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mockall::predicate::eq;

    use crate::{error::AppError, models::BookInstance, repository::mock::MockRepository};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn on_loan(id: Uuid, due_back: NaiveDate) -> BookInstance {
        BookInstance {
            id,
            book_id: 1,
            imprint: "Gollancz, 2015".to_string(),
            due_back: Some(due_back),
            borrower_id: Some(42),
            status: LoanStatus::OnLoan,
            book_title: Some("The Fifth Season".to_string()),
        }
    }

    #[tokio::test]
    async fn form_is_prefilled_three_weeks_out() {
        let id = Uuid::new_v4();
        let mut mocks = MockRepository::new();
        mocks
            .instances
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |id| Ok(on_loan(id, today())));
        let service = LoansService::new(mocks.build());

        let form = service.renewal_form(id, today()).await.unwrap();
        assert_eq!(form.renewal_date, "2024-05-31");
        assert!(form.errors.is_empty());
        assert_eq!(form.instance.id, id);
    }

    #[tokio::test]
    async fn accepted_date_is_persisted() {
        let id = Uuid::new_v4();
        let new_due = today() + Duration::days(7);
        let mut mocks = MockRepository::new();
        mocks
            .instances
            .expect_get_by_id()
            .returning(move |id| Ok(on_loan(id, today() - Duration::days(1))));
        mocks
            .instances
            .expect_update_due_back()
            .with(eq(id), eq(new_due))
            .times(1)
            .returning(|_, _| Ok(()));
        let service = LoansService::new(mocks.build());

        let outcome = service.renew(id, "2024-05-17", today()).await.unwrap();
        assert!(matches!(
            outcome,
            RenewalOutcome::Renewed { instance_id, due_back } if instance_id == id && due_back == new_due
        ));
    }

    #[tokio::test]
    async fn past_date_is_rejected_without_write() {
        let id = Uuid::new_v4();
        let mut mocks = MockRepository::new();
        mocks
            .instances
            .expect_get_by_id()
            .returning(move |id| Ok(on_loan(id, today() - Duration::days(1))));
        mocks.instances.expect_update_due_back().never();
        let service = LoansService::new(mocks.build());

        let outcome = service.renew(id, "2024-05-07", today()).await.unwrap();
        match outcome {
            RenewalOutcome::Rejected(form) => {
                assert_eq!(form.renewal_date, "2024-05-07");
                assert_eq!(form.errors.len(), 1);
                assert_eq!(form.errors[0].field, "renewal_date");
                assert_eq!(form.errors[0].message, "Invalid date - renewal in past");
                assert_eq!(form.instance.due_back, Some(today() - Duration::days(1)));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_instance_is_not_found() {
        let mut mocks = MockRepository::new();
        mocks
            .instances
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Book instance with id {} not found", id))));
        mocks.instances.expect_update_due_back().never();
        let service = LoansService::new(mocks.build());

        let result = service.renew(Uuid::new_v4(), "2024-05-17", today()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn instance_not_on_loan_is_still_renewed() {
        let id = Uuid::new_v4();
        let mut mocks = MockRepository::new();
        mocks.instances.expect_get_by_id().returning(move |id| {
            let mut instance = on_loan(id, today());
            instance.status = LoanStatus::Maintenance;
            Ok(instance)
        });
        mocks
            .instances
            .expect_update_due_back()
            .times(1)
            .returning(|_, _| Ok(()));
        let service = LoansService::new(mocks.build());

        let outcome = service.renew(id, "2024-06-07", today()).await.unwrap();
        assert!(matches!(outcome, RenewalOutcome::Renewed { .. }));
    }

    #[tokio::test]
    async fn borrowed_list_queries_on_loan_for_the_user() {
        let first = on_loan(Uuid::new_v4(), today() - Duration::days(2));
        let second = on_loan(Uuid::new_v4(), today() + Duration::days(5));
        let rows = vec![first.clone(), second.clone()];

        let mut mocks = MockRepository::new();
        mocks
            .instances
            .expect_list_for_borrower()
            .with(eq(42), eq(LoanStatus::OnLoan), eq(10), eq(10))
            .returning(move |_, _, _, _| Ok((rows.clone(), 12)));
        let service = LoansService::new(mocks.build());

        let (items, total) = service
            .borrowed_by(42, &PageQuery::new(Some(2)), today())
            .await
            .unwrap();

        assert_eq!(total, 12);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, first.id);
        assert!(items[0].is_overdue);
        assert!(!items[1].is_overdue);
    }
}
